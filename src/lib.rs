// Déclaration des modules
pub mod crypto_error;
pub mod config;
pub mod paillier;
pub mod key_management;

pub use crate::paillier::math;
pub use crate::paillier::prime_source;
pub use crate::paillier::p_keygen;
pub use crate::paillier::p_encrypt;
pub use crate::paillier::p_decrypt;
pub use crate::paillier::p_homomorphic;

// Fonctions mathématiques principales
pub use crate::paillier::math::{l_function, gcd, mod_inverse, lcm};

// Source de premiers
pub use crate::paillier::prime_source::{PrimeSource, RngPrimeSource, OsPrimeSource, random_coprime_to};

// Types depuis keygen
pub use crate::paillier::p_keygen::{PublicKey, SecretKey, KeyPair};

// Opérations du moteur
pub use crate::paillier::p_keygen::p_keygen::{p_keygen, p_keygen_with, p_keygen_with_config};
pub use crate::paillier::p_encrypt::p_encrypt::{p_encrypt, p_encrypt_with, p_encrypt_with_config, p_encrypt_signed};
pub use crate::paillier::p_decrypt::p_decrypt::p_decrypt;
pub use crate::paillier::p_homomorphic::{p_add, p_mul_plain};

// Erreur centralisée
pub use crypto_error::CryptoError;

// Configuration
pub use config::EngineConfig;

// Registre de clés thread-safe
pub use key_management::{KeyRegistry, RegistryError};
