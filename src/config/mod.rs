pub mod config;

pub use self::config::{EngineConfig, ENV_PRIME_BITS, ENV_COPRIME_MAX_ATTEMPTS};
