use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::RngCore;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Nombre de rounds Miller-Rabin
//
// Chaque round laisse passer un composé avec une probabilité <= 1/4 :
// 50 rounds bornent l'erreur à 2^-100, quelle que soit la taille du candidat.
// ---------------------------------------------------------------------------
pub const MILLER_RABIN_ROUNDS: u32 = 50;

// Petits premiers impairs < 1000 (crible préliminaire avant Miller-Rabin)
const SMALL_PRIMES: &[u32] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,  37,  41,  43,  47,  53,  59,
     61,  67,  71,  73,  79,  83,  89,  97, 101, 103, 107, 109, 113, 127, 131, 137,
    139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227,
    229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307, 311, 313,
    317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509,
    521, 523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599, 601, 607, 613, 617,
    619, 631, 641, 643, 647, 653, 659, 661, 673, 677, 683, 691, 701, 709, 719, 727,
    733, 739, 743, 751, 757, 761, 769, 773, 787, 797, 809, 811, 821, 823, 827, 829,
    839, 853, 857, 859, 863, 877, 881, 883, 887, 907, 911, 919, 929, 937, 941, 947,
    953, 967, 971, 977, 983, 991, 997,
];

// ---------------------------------------------------------------------------
// Fonction L(x) = (x-1)/n, division exacte.
//
// Pour un chiffré valide sous la bonne clé, x = c^lambda mod n² vaut 1 + k·n.
// Toute autre forme (x = 0, reste non nul) signale un chiffré hors de Z*_{n²}
// ou une clé étrangère : on refuse au lieu de tronquer silencieusement.
// ---------------------------------------------------------------------------
pub fn l_function(x: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    // n = 0 : clé corrompue
    if n.is_zero() {
        return Err(CryptoError::NoModularInverse);
    }
    if x.is_zero() {
        return Err(CryptoError::NotInCiphertextGroup);
    }
    let (quotient, remainder) = (x - BigUint::one()).div_rem(n);
    if !remainder.is_zero() {
        return Err(CryptoError::NotInCiphertextGroup);
    }
    Ok(quotient)
}

// Calcule le pgcd de deux nombres
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

// lcm(a, b) = a·b / gcd(a, b)
pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) / gcd(a, b)
}

// ---------------------------------------------------------------------------
// Crible par petits premiers.
//
// Retourne false si n est divisible par un petit premier (sans en être un).
// Élimine la grande majorité des candidats sans aucun modpow.
// ---------------------------------------------------------------------------
pub fn passes_small_prime_sieve(n: &BigUint) -> bool {
    for &sp in SMALL_PRIMES {
        let bp = BigUint::from(sp);
        if n == &bp {
            return true;
        }
        if (n % &bp).is_zero() {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Test de primalité probabiliste de Miller-Rabin.
// ---------------------------------------------------------------------------
pub fn is_probable_prime(n: &BigUint, rounds: u32, rng: &mut impl RngCore) -> bool {
    let two = BigUint::from(2u32);
    if n < &two { return false; }
    if n == &two { return true; }
    if n.is_even() { return false; }
    if SMALL_PRIMES.iter().any(|&p| n == &BigUint::from(p)) { return true; }
    if !passes_small_prime_sieve(n) { return false; }

    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    // n > 997 ici, donc l'intervalle [2, n-1) des témoins est non vide
    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n.
// Retourne Err(CryptoError::NoModularInverse) si gcd(a,n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    if n.is_zero() {
        return Err(CryptoError::NoModularInverse);
    }
    let (g, x) = extended_gcd(a, n);
    if !g.is_one() {
        return Err(CryptoError::NoModularInverse);
    }

    let n_big = BigInt::from(n.clone());
    x.mod_floor(&n_big)
        .to_biguint()
        .ok_or(CryptoError::NegativeConversion)
}

// Euclide étendu : retourne (gcd, s) tel que a·s ≡ gcd (mod b)
fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    (old_r.to_biguint().unwrap_or_default(), old_s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_l_function_exact_division() {
        let n = BigUint::from(35u32);
        // x = 1 + 4·35
        let x = BigUint::from(141u32);
        assert_eq!(l_function(&x, &n), Ok(BigUint::from(4u32)));
        assert_eq!(l_function(&BigUint::one(), &n), Ok(BigUint::zero()));
    }

    #[test]
    fn test_l_function_rejects_non_multiple() {
        let n = BigUint::from(35u32);
        assert_eq!(l_function(&BigUint::from(140u32), &n), Err(CryptoError::NotInCiphertextGroup));
        assert_eq!(l_function(&BigUint::zero(), &n), Err(CryptoError::NotInCiphertextGroup));
    }

    #[test]
    fn test_l_function_zero_modulus() {
        assert_eq!(l_function(&BigUint::one(), &BigUint::zero()), Err(CryptoError::NoModularInverse));
    }

    #[test]
    fn test_gcd_and_lcm() {
        let a = BigUint::from(12u32);
        let b = BigUint::from(18u32);
        assert_eq!(gcd(&a, &b), BigUint::from(6u32));
        assert_eq!(lcm(&a, &b), BigUint::from(36u32));
    }

    #[test]
    fn test_mod_inverse() {
        let inv = mod_inverse(&BigUint::from(3u32), &BigUint::from(11u32)).unwrap();
        assert_eq!(inv, BigUint::from(4u32));
        assert_eq!(
            mod_inverse(&BigUint::from(6u32), &BigUint::from(9u32)),
            Err(CryptoError::NoModularInverse)
        );
    }

    #[test]
    fn test_mod_inverse_large() {
        // 2^127 - 1 est premier : tout a non nul y est inversible
        let p = (BigUint::one() << 127u32) - BigUint::one();
        let a = BigUint::from(123_456_789u64);
        let inv = mod_inverse(&a, &p).unwrap();
        assert!(((&a * &inv) % &p).is_one());
    }

    #[test]
    fn test_is_probable_prime_known_values() {
        let mut rng = StdRng::seed_from_u64(7);
        for p in [2u32, 3, 5, 997, 7919, 65_521] {
            assert!(is_probable_prime(&BigUint::from(p), MILLER_RABIN_ROUNDS, &mut rng), "{p}");
        }
        for c in [0u32, 1, 4, 561, 1105, 7917, 65_535] {
            assert!(!is_probable_prime(&BigUint::from(c), MILLER_RABIN_ROUNDS, &mut rng), "{c}");
        }
        // Nombre de Mersenne premier M127
        let m127 = (BigUint::one() << 127u32) - BigUint::one();
        assert!(is_probable_prime(&m127, MILLER_RABIN_ROUNDS, &mut rng));
        // M127 · 3 n'est pas premier, ni M127²
        assert!(!is_probable_prime(&(&m127 * &m127), MILLER_RABIN_ROUNDS, &mut rng));
    }

    #[test]
    fn test_sieve() {
        assert!(passes_small_prime_sieve(&BigUint::from(997u32)));
        assert!(!passes_small_prime_sieve(&BigUint::from(991u32 * 3)));
        assert!(passes_small_prime_sieve(&BigUint::from(1009u32)));
    }
}
