use std::fmt;
use num_bigint::BigUint;
use num_traits::One;
use tracing::{info, warn};
use zeroize::Zeroize;
use crate::config::EngineConfig;
use crate::crypto_error::CryptoError;
use crate::paillier::math::{l_function, gcd, lcm, mod_inverse};
use crate::paillier::prime_source::{PrimeSource, OsPrimeSource};

/// Taille minimale acceptée pour p et q (utile aux tests rapides)
pub const MIN_PRIME_BITS: u64 = 16;

/// Taille de référence pour p et q ; en dessous on journalise un avertissement
pub const RECOMMENDED_PRIME_BITS: u64 = 256;

// Nombre de tirages de q tolérés tant que q == p
const MAX_DISTINCT_PRIME_ATTEMPTS: u64 = 16;

// ============================================================================
// Clé publique Paillier: pas de données secrètes, pas de zeroize nécessaire
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) n:         BigUint,
    pub(crate) g:         BigUint,
    pub(crate) n_squared: BigUint,
}

impl PublicKey {
    /// Construit la clé publique (n, g = n+1) à partir du module.
    ///
    /// n doit avoir au moins 2·MIN_PRIME_BITS bits, sinon aucun facteur
    /// d'aveuglement de la taille de p et q ne peut être tiré.
    pub fn from_modulus(n: BigUint) -> Result<Self, CryptoError> {
        if n.bits() < 2 * MIN_PRIME_BITS {
            return Err(CryptoError::KeySizeTooSmall {
                requested: n.bits() / 2,
                minimum:   MIN_PRIME_BITS,
            });
        }
        let g         = &n + BigUint::one();
        let n_squared = &n * &n;
        Ok(PublicKey { n, g, n_squared })
    }

    pub fn n(&self) -> &BigUint { &self.n }

    pub fn g(&self) -> &BigUint { &self.g }

    pub fn n_squared(&self) -> &BigUint { &self.n_squared }

    /// Taille des facteurs d'aveuglement tirés au chiffrement : celle de p et q,
    /// ce qui garantit r < n.
    pub fn blinding_bits(&self) -> u64 {
        self.n.bits() / 2
    }
}

// ============================================================================
// Helper : écrase en place les limbs d'un BigUint avant libération
// ============================================================================
fn zeroize_biguint(value: &mut BigUint) {
    let limbs = ((value.bits() + 31) / 32) as usize;
    if limbs > 0 {
        // assign_from_slice réutilise le buffer existant : les anciens limbs
        // sont recouverts de zéros avant la normalisation
        value.assign_from_slice(&vec![0u32; limbs]);
    }
    *value = BigUint::default();
}

// ============================================================================
// Clé secrète Paillier: ZEROISÉE À LA DESTRUCTION
//
// mu est précalculé une fois : la clé est immuable après construction et
// peut être partagée entre threads sans verrou.
// ============================================================================
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    pub(crate) lambda:    BigUint,
    pub(crate) mu:        BigUint,
    pub(crate) n:         BigUint,
    pub(crate) n_squared: BigUint,
}

impl SecretKey {
    /// Reconstruit une clé secrète depuis (lambda, n) en recalculant mu.
    ///
    /// Échoue avec `NoModularInverse` si L(g^lambda mod n²) n'est pas
    /// inversible modulo n (lambda ou n corrompu).
    pub fn new(lambda: BigUint, n: BigUint) -> Result<Self, CryptoError> {
        // n = 0 ou 1 : aucun inverse modulo n n'a de sens
        if n < BigUint::from(2u32) {
            return Err(CryptoError::NoModularInverse);
        }
        let n_squared = &n * &n;
        let mu        = derive_mu(&lambda, &n, &n_squared)?;
        Ok(SecretKey { lambda, mu, n, n_squared })
    }

    pub fn lambda(&self) -> &BigUint { &self.lambda }

    pub fn mu(&self) -> &BigUint { &self.mu }

    pub fn n(&self) -> &BigUint { &self.n }

    pub fn n_squared(&self) -> &BigUint { &self.n_squared }

    /// Recalcule mu par exponentiation modulaire complète de g = n+1.
    /// Doit coïncider avec la valeur mise en cache à la génération.
    pub fn recompute_mu(&self) -> Result<BigUint, CryptoError> {
        let g        = &self.n + BigUint::one();
        let g_lambda = g.modpow(&self.lambda, &self.n_squared);
        let l        = l_function(&g_lambda, &self.n)?;
        mod_inverse(&l, &self.n)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("lambda", &format_args!("<{} bits>", self.lambda.bits()))
            .field("mu", &format_args!("<{} bits>", self.mu.bits()))
            .field("n", &self.n)
            .finish()
    }
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.lambda);
        zeroize_biguint(&mut self.mu);
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Paire de clés
// ============================================================================
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: SecretKey,
}

// ----------------------------------------------------------------------------
// mu = L(g^lambda mod n²)^-1 mod n avec g = n+1.
//
// Binôme de Newton : (n+1)^lambda mod n² = 1 + lambda·n (les termes en n²
// s'annulent), donc une multiplication suffit et L(...) = lambda mod n.
// ----------------------------------------------------------------------------
fn derive_mu(lambda: &BigUint, n: &BigUint, n_squared: &BigUint) -> Result<BigUint, CryptoError> {
    let g_lambda   = (BigUint::one() + lambda * n) % n_squared;
    let l_g_lambda = l_function(&g_lambda, n)?;
    mod_inverse(&l_g_lambda, n)
}

// ============================================================================
// Génération de clés Paillier
//
// p et q ont la même taille : g = n+1 est alors un générateur valide et
// aucune recherche aléatoire de g n'est nécessaire.
// ============================================================================
pub fn p_keygen(nbits: u64) -> Result<KeyPair, CryptoError> {
    p_keygen_with(nbits, &mut OsPrimeSource::os())
}

/// Génère une paire de clés selon la configuration (taille et budget de candidats).
pub fn p_keygen_with_config(config: &EngineConfig) -> Result<KeyPair, CryptoError> {
    config.validate()?;
    let mut source = OsPrimeSource::os().with_attempt_factor(config.prime_attempt_factor);
    p_keygen_with(config.prime_bits, &mut source)
}

/// Génère une paire de clés en tirant p et q depuis `source`.
pub fn p_keygen_with<S: PrimeSource + ?Sized>(nbits: u64, source: &mut S) -> Result<KeyPair, CryptoError> {
    if nbits < MIN_PRIME_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: nbits,
            minimum:   MIN_PRIME_BITS,
        });
    }
    if nbits < RECOMMENDED_PRIME_BITS {
        warn!(nbits, recommended = RECOMMENDED_PRIME_BITS, "taille de premier inférieure à la référence");
    }

    let p = source.random_probable_prime(nbits)?;
    let q = draw_distinct_prime(source, nbits, &p)?;

    let n         = &p * &q;
    let n_squared = &n * &n;

    let p_minus_1 = &p - BigUint::one();
    let q_minus_1 = &q - BigUint::one();

    // gcd(n, (p-1)(q-1)) = 1 est garanti pour p, q de même taille ;
    // une source défaillante ne doit pas produire une clé dégénérée
    if !gcd(&n, &(&p_minus_1 * &q_minus_1)).is_one() {
        return Err(CryptoError::NoModularInverse);
    }

    let lambda     = lcm(&p_minus_1, &q_minus_1);
    let mu         = derive_mu(&lambda, &n, &n_squared)?;
    let public_key = PublicKey::from_modulus(n.clone())?;

    info!(prime_bits = nbits, modulus_bits = n.bits(), "paire de clés Paillier générée");

    Ok(KeyPair {
        public_key,
        secret_key: SecretKey { lambda, mu, n, n_squared },
    })
}

fn draw_distinct_prime<S: PrimeSource + ?Sized>(
    source: &mut S,
    nbits:  u64,
    p:      &BigUint,
) -> Result<BigUint, CryptoError> {
    for _ in 0..MAX_DISTINCT_PRIME_ATTEMPTS {
        let q = source.random_probable_prime(nbits)?;
        if &q != p {
            return Ok(q);
        }
    }
    warn!(nbits, "la source renvoie toujours le même premier");
    Err(CryptoError::PrimeGenerationFailure { bits: nbits, attempts: MAX_DISTINCT_PRIME_ATTEMPTS })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::prime_source::RngPrimeSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FixedSource(BigUint);

    impl PrimeSource for FixedSource {
        fn random_probable_prime(&mut self, _bits: u64) -> Result<BigUint, CryptoError> {
            Ok(self.0.clone())
        }
    }

    fn seeded_keypair(bits: u64, seed: u64) -> KeyPair {
        let mut source = RngPrimeSource::new(StdRng::seed_from_u64(seed));
        p_keygen_with(bits, &mut source).unwrap()
    }

    #[test]
    fn test_keypair_structure() {
        let kp = seeded_keypair(64, 11);
        let pk = &kp.public_key;
        let sk = &kp.secret_key;

        assert_eq!(pk.n().bits(), 128);
        assert_eq!(pk.g(), &(pk.n() + BigUint::one()));
        assert_eq!(pk.n_squared(), &(pk.n() * pk.n()));
        assert_eq!(sk.n(), pk.n());
        assert_eq!(sk.n_squared(), pk.n_squared());
        // L(g^lambda) = lambda mod n, donc lambda·mu ≡ 1 (mod n)
        assert!(((sk.lambda() * sk.mu()) % pk.n()).is_one());
    }

    #[test]
    fn test_cached_mu_matches_recomputed() {
        for seed in 0..4 {
            let kp = seeded_keypair(64, 100 + seed);
            assert_eq!(kp.secret_key.recompute_mu().unwrap(), *kp.secret_key.mu());
        }
    }

    #[test]
    fn test_secret_key_new_matches_generated() {
        let kp = seeded_keypair(64, 21);
        let rebuilt = SecretKey::new(kp.secret_key.lambda().clone(), kp.public_key.n().clone()).unwrap();
        assert_eq!(rebuilt, kp.secret_key);
    }

    #[test]
    fn test_secret_key_new_rejects_non_invertible() {
        // lambda multiple de 7 avec n = 7·11 : L(g^lambda) = lambda mod n non inversible
        let n = BigUint::from(77u32);
        assert_eq!(SecretKey::new(BigUint::from(14u32), n), Err(CryptoError::NoModularInverse));
    }

    #[test]
    fn test_secret_key_new_rejects_degenerate_modulus() {
        assert_eq!(SecretKey::new(BigUint::from(3u32), BigUint::default()), Err(CryptoError::NoModularInverse));
        assert_eq!(SecretKey::new(BigUint::from(3u32), BigUint::one()), Err(CryptoError::NoModularInverse));
    }

    #[test]
    fn test_public_key_from_modulus() {
        let kp = seeded_keypair(32, 8);
        let pk = PublicKey::from_modulus(kp.public_key.n().clone()).unwrap();
        assert_eq!(pk, kp.public_key);
        assert_eq!(pk.blinding_bits(), 32);
    }

    #[test]
    fn test_public_key_from_modulus_rejects_small_modulus() {
        assert_eq!(
            PublicKey::from_modulus(BigUint::from(15u32)),
            Err(CryptoError::KeySizeTooSmall { requested: 2, minimum: MIN_PRIME_BITS })
        );
        assert!(matches!(
            PublicKey::from_modulus(BigUint::default()),
            Err(CryptoError::KeySizeTooSmall { requested: 0, .. })
        ));
    }

    #[test]
    fn test_key_size_too_small() {
        assert!(matches!(
            p_keygen(8),
            Err(CryptoError::KeySizeTooSmall { requested: 8, minimum: MIN_PRIME_BITS })
        ));
    }

    #[test]
    fn test_exhausted_source_propagates() {
        let mut source = RngPrimeSource::new(StdRng::seed_from_u64(3)).with_attempt_factor(0);
        assert!(matches!(
            p_keygen_with(64, &mut source),
            Err(CryptoError::PrimeGenerationFailure { bits: 64, .. })
        ));
    }

    #[test]
    fn test_same_prime_source_fails() {
        let mut source = FixedSource(BigUint::from(65_521u32));
        assert_eq!(
            p_keygen_with(16, &mut source).err(),
            Some(CryptoError::PrimeGenerationFailure { bits: 16, attempts: MAX_DISTINCT_PRIME_ATTEMPTS })
        );
    }

    #[test]
    fn test_keygen_os_entropy() {
        let kp = p_keygen(128).unwrap();
        assert_eq!(kp.public_key.n().bits(), 256);
    }

    #[test]
    fn test_debug_hides_secret() {
        let kp = seeded_keypair(32, 5);
        let dbg = format!("{:?}", kp.secret_key);
        assert!(!dbg.contains(&kp.secret_key.lambda().to_string()));
        assert!(dbg.contains("bits"));
    }

    #[test]
    fn test_zeroize_clears_secret_fields() {
        let kp = seeded_keypair(32, 6);
        let mut sk = kp.secret_key.clone();
        sk.zeroize();
        assert_eq!(sk.lambda(), &BigUint::default());
        assert_eq!(sk.mu(), &BigUint::default());
    }
}
