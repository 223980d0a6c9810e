pub mod p_keygen;

pub use self::p_keygen::{
    PublicKey, SecretKey, KeyPair,
    p_keygen, p_keygen_with, p_keygen_with_config,
    MIN_PRIME_BITS, RECOMMENDED_PRIME_BITS,
};
