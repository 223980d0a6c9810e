use num_bigint::BigUint;
use crate::crypto_error::CryptoError;
use crate::paillier::math::l_function;
use crate::paillier::p_keygen::SecretKey;

// ---------------------------------------------------------------------------
// Déchiffrement Paillier : m = L(c^lambda mod n²) · mu  mod n
//
// Déterministe : le facteur d'aveuglement disparaît dans c^lambda.
// ---------------------------------------------------------------------------
pub fn p_decrypt(c: &BigUint, sk: &SecretKey) -> Result<BigUint, CryptoError> {
    if c >= &sk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    // c^lambda mod n², réduit à chaque étape
    let c_lambda = c.modpow(&sk.lambda, &sk.n_squared);

    // L(c^lambda mod n²), division exacte vérifiée
    let l_c_lambda = l_function(&c_lambda, &sk.n)?;

    Ok((&l_c_lambda * &sk.mu) % &sk.n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::p_encrypt::p_encrypt;
    use crate::paillier::p_keygen::{p_keygen_with, KeyPair};
    use crate::paillier::prime_source::RngPrimeSource;
    use num_bigint::RandBigInt;
    use num_traits::{One, Zero};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn keypair(seed: u64) -> KeyPair {
        let mut source = RngPrimeSource::new(StdRng::seed_from_u64(seed));
        p_keygen_with(64, &mut source).unwrap()
    }

    #[test]
    fn test_round_trip_small_values() {
        let kp = keypair(1);
        for m in [0u32, 1, 2, 5, 11, 13, 1_000_000] {
            let m = BigUint::from(m);
            let c = p_encrypt(&m, &kp.public_key).unwrap();
            assert_eq!(p_decrypt(&c, &kp.secret_key).unwrap(), m);
        }
    }

    #[test]
    fn test_round_trip_random_values_many_keys() {
        let mut rng = StdRng::seed_from_u64(77);
        for seed in 10..15 {
            let kp = keypair(seed);
            for _ in 0..5 {
                let m = rng.gen_biguint_below(kp.public_key.n());
                let c = p_encrypt(&m, &kp.public_key).unwrap();
                assert_eq!(p_decrypt(&c, &kp.secret_key).unwrap(), m);
            }
        }
    }

    #[test]
    fn test_round_trip_max_plaintext() {
        let kp = keypair(2);
        let m = kp.public_key.n() - BigUint::one();
        let c = p_encrypt(&m, &kp.public_key).unwrap();
        assert_eq!(p_decrypt(&c, &kp.secret_key).unwrap(), m);
    }

    #[test]
    fn test_rejects_out_of_range_ciphertext() {
        let kp = keypair(3);
        let n_sq = kp.public_key.n_squared().clone();
        assert_eq!(p_decrypt(&n_sq, &kp.secret_key), Err(CryptoError::CiphertextOutOfRange));
    }

    #[test]
    fn test_rejects_ciphertext_outside_group() {
        let kp = keypair(4);
        // 0 et n ne sont pas inversibles modulo n²
        assert_eq!(p_decrypt(&BigUint::zero(), &kp.secret_key), Err(CryptoError::NotInCiphertextGroup));
        assert_eq!(
            p_decrypt(kp.public_key.n(), &kp.secret_key),
            Err(CryptoError::NotInCiphertextGroup)
        );
    }

    #[test]
    fn test_foreign_key_does_not_recover_plaintext() {
        let kp_a = keypair(5);
        let kp_b = keypair(6);
        let m = BigUint::from(11u32);
        let c = p_encrypt(&m, &kp_a.public_key).unwrap();
        match p_decrypt(&c, &kp_b.secret_key) {
            Ok(other) => assert_ne!(other, m),
            Err(e) => assert!(matches!(e, CryptoError::CiphertextOutOfRange | CryptoError::NotInCiphertextGroup)),
        }
    }

    #[test]
    fn test_decryption_is_deterministic() {
        let kp = keypair(7);
        let c = p_encrypt(&BigUint::from(42u32), &kp.public_key).unwrap();
        let a = p_decrypt(&c, &kp.secret_key).unwrap();
        let b = p_decrypt(&c, &kp.secret_key).unwrap();
        assert_eq!(a, b);
    }
}
