pub mod crypto_error;

pub use self::crypto_error::CryptoError;
