pub mod p_encrypt;

pub use self::p_encrypt::{p_encrypt, p_encrypt_with, p_encrypt_with_config, p_encrypt_signed};
