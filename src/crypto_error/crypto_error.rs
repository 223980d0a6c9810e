// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules renvoient ce type au lieu de panic!/assert!/unwrap().
// Une génération de clés échoue entièrement ou réussit entièrement :
// aucune clé partielle n'est jamais rendue à l'appelant.
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Source de premiers / coprimes ---
    /// Budget de candidats épuisé sans trouver de premier probable
    PrimeGenerationFailure { bits: u64, attempts: u64 },
    /// Aucun facteur d'aveuglement premier avec n après `attempts` tirages
    CoprimeSearchExhausted { attempts: u32 },

    // --- Erreurs de paramètres d'entrée ---
    /// Le message m est hors de [0, n)
    PlaintextOutOfRange,
    /// Le chiffré c est >= n² (hors domaine ciphertext Paillier)
    CiphertextOutOfRange,
    /// La taille de premier demandée est trop petite (< MIN_PRIME_BITS)
    KeySizeTooSmall { requested: u64, minimum: u64 },

    // --- Erreurs mathématiques internes ---
    /// L'inverse modulaire n'existe pas (gcd != 1) : clé corrompue
    NoModularInverse,
    /// c^lambda mod n² n'est pas de la forme 1 + k·n : chiffré hors de Z*_{n²}
    /// ou clé qui ne correspond pas
    NotInCiphertextGroup,
    /// Conversion BigInt -> BigUint échouée (résultat négatif, invariant interne)
    NegativeConversion,

    // --- Configuration ---
    InvalidConfig(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::PrimeGenerationFailure { bits, attempts } =>
                write!(f, "Aucun premier de {bits} bits trouvé après {attempts} candidats"),
            CryptoError::CoprimeSearchExhausted { attempts } =>
                write!(f, "Aucun facteur d'aveuglement premier avec n après {attempts} tirages"),
            CryptoError::PlaintextOutOfRange =>
                write!(f, "Le message doit être dans [0, n)"),
            CryptoError::CiphertextOutOfRange =>
                write!(f, "Le chiffré doit être dans [0, n²)"),
            CryptoError::KeySizeTooSmall { requested, minimum } =>
                write!(f, "Taille de premier {requested} bits insuffisante, minimum requis : {minimum} bits"),
            CryptoError::NoModularInverse =>
                write!(f, "Impossible de calculer l'inverse modulaire (gcd != 1)"),
            CryptoError::NotInCiphertextGroup =>
                write!(f, "Chiffré invalide pour cette clé : L(c^lambda mod n²) n'est pas entier"),
            CryptoError::NegativeConversion =>
                write!(f, "Conversion interne BigInt -> BigUint : résultat négatif inattendu"),
            CryptoError::InvalidConfig(msg) =>
                write!(f, "Configuration invalide : {msg}"),
        }
    }
}

impl std::error::Error for CryptoError {}
