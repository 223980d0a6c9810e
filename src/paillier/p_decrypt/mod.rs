pub mod p_decrypt;

pub use self::p_decrypt::p_decrypt;
