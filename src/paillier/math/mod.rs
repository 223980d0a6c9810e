// Réexporte toutes les fonctions mathématiques

mod math;

pub use math::{l_function, gcd, lcm, mod_inverse, is_probable_prime, passes_small_prime_sieve, MILLER_RABIN_ROUNDS};
