pub mod math;
pub mod prime_source;
pub mod p_keygen;
pub mod p_encrypt;
pub mod p_decrypt;
pub mod p_homomorphic;
