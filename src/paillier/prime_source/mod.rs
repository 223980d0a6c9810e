pub mod prime_source;

pub use self::prime_source::{
    PrimeSource, RngPrimeSource, OsPrimeSource, random_coprime_to,
    MAX_COPRIME_ATTEMPTS, DEFAULT_PRIME_ATTEMPT_FACTOR,
};
