pub mod p_homomorphic;

pub use self::p_homomorphic::{p_add, p_mul_plain};
