// ===========================================================================
// Source de premiers probables et de facteurs d'aveuglement
//
// Feuille du moteur Paillier : la génération de clés consomme des premiers,
// le chiffrement consomme des valeurs premières avec n. Les deux boucles de
// recherche sont bornées et échouent bruyamment une fois le budget épuisé.
// ===========================================================================

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand_core::{OsRng, RngCore};
use tracing::{debug, warn};
use crate::crypto_error::CryptoError;
use crate::paillier::math::{gcd, is_probable_prime, passes_small_prime_sieve, MILLER_RABIN_ROUNDS};

/// Plafond de tirages pour trouver r premier avec n.
/// En pratique un seul tirage suffit : un premier de la taille de p ou q
/// n'est pas un facteur de n avec une probabilité écrasante.
pub const MAX_COPRIME_ATTEMPTS: u32 = 1000;

/// Budget de candidats par bit demandé. Le théorème des nombres premiers donne
/// environ ln(2^bits)/2 ≈ 0.35·bits candidats impairs par premier : 64·bits
/// laisse une marge de plusieurs ordres de grandeur.
pub const DEFAULT_PRIME_ATTEMPT_FACTOR: u64 = 64;

// Besoin de deux bits hauts distincts et du bit de parité
const MIN_CANDIDATE_BITS: u64 = 3;

/// Fournisseur de premiers probables de taille fixée.
///
/// L'implémentation doit renvoyer un premier de exactement `bits` bits dont la
/// probabilité d'être composé est négligeable, ou une erreur si son budget
/// interne est épuisé.
pub trait PrimeSource {
    fn random_probable_prime(&mut self, bits: u64) -> Result<BigUint, CryptoError>;
}

impl<S: PrimeSource + ?Sized> PrimeSource for &mut S {
    fn random_probable_prime(&mut self, bits: u64) -> Result<BigUint, CryptoError> {
        (**self).random_probable_prime(bits)
    }
}

// ============================================================================
// Source fondée sur un générateur aléatoire quelconque
// ============================================================================
#[derive(Clone, Debug)]
pub struct RngPrimeSource<R> {
    rng:            R,
    attempt_factor: u64,
}

/// Source par défaut : entropie système.
pub type OsPrimeSource = RngPrimeSource<OsRng>;

impl OsPrimeSource {
    pub fn os() -> Self {
        RngPrimeSource::new(OsRng)
    }
}

impl Default for OsPrimeSource {
    fn default() -> Self { Self::os() }
}

impl<R: RngCore> RngPrimeSource<R> {
    pub fn new(rng: R) -> Self {
        RngPrimeSource { rng, attempt_factor: DEFAULT_PRIME_ATTEMPT_FACTOR }
    }

    /// Remplace le budget de candidats (`factor · bits` candidats par premier).
    pub fn with_attempt_factor(mut self, factor: u64) -> Self {
        self.attempt_factor = factor;
        self
    }

    fn attempt_budget(&self, bits: u64) -> u64 {
        self.attempt_factor.saturating_mul(bits)
    }
}

impl<R: RngCore> PrimeSource for RngPrimeSource<R> {
    // -----------------------------------------------------------------------
    // Tire des candidats impairs dont les deux bits de poids fort sont à 1 :
    // deux premiers de `bits` bits donnent alors un n d'exactement 2·bits bits.
    // -----------------------------------------------------------------------
    fn random_probable_prime(&mut self, bits: u64) -> Result<BigUint, CryptoError> {
        if bits < MIN_CANDIDATE_BITS {
            return Err(CryptoError::KeySizeTooSmall {
                requested: bits,
                minimum:   MIN_CANDIDATE_BITS,
            });
        }

        let budget = self.attempt_budget(bits);
        for attempt in 1..=budget {
            let mut candidate = self.rng.gen_biguint(bits);
            candidate.set_bit(bits - 1, true);
            candidate.set_bit(bits - 2, true);
            candidate.set_bit(0, true);

            if !passes_small_prime_sieve(&candidate) {
                continue;
            }
            if is_probable_prime(&candidate, MILLER_RABIN_ROUNDS, &mut self.rng) {
                debug!(bits, attempt, "premier probable trouvé");
                return Ok(candidate);
            }
        }

        warn!(bits, budget, "budget de candidats premiers épuisé");
        Err(CryptoError::PrimeGenerationFailure { bits, attempts: budget })
    }
}

// ---------------------------------------------------------------------------
// Tire un premier de `bits` bits, premier avec `modulus` et dans (0, modulus).
//
// Boucle bornée par `max_attempts` : une source hostile ou défaillante ne
// peut pas bloquer le chiffrement indéfiniment.
// ---------------------------------------------------------------------------
pub fn random_coprime_to<S: PrimeSource + ?Sized>(
    source:       &mut S,
    modulus:      &BigUint,
    bits:         u64,
    max_attempts: u32,
) -> Result<BigUint, CryptoError> {
    for attempt in 1..=max_attempts {
        let candidate = source.random_probable_prime(bits)?;
        if &candidate < modulus && gcd(&candidate, modulus).is_one() {
            if attempt > 1 {
                debug!(attempt, "facteur d'aveuglement accepté après rejet");
            }
            return Ok(candidate);
        }
    }

    warn!(max_attempts, "recherche de facteur d'aveuglement épuisée");
    Err(CryptoError::CoprimeSearchExhausted { attempts: max_attempts })
}
