use num_bigint::BigUint;
use crate::crypto_error::CryptoError;
use crate::paillier::p_keygen::PublicKey;

// ---------------------------------------------------------------------------
// Addition homomorphique : E(m1) · E(m2) mod n² = E((m1 + m2) mod n)
//
// Le résultat reste aléatoire : son facteur d'aveuglement est r1·r2.
// ---------------------------------------------------------------------------
pub fn p_add(c1: &BigUint, c2: &BigUint, pk: &PublicKey) -> Result<BigUint, CryptoError> {
    if c1 >= &pk.n_squared || c2 >= &pk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }
    Ok((c1 * c2) % &pk.n_squared)
}

// ---------------------------------------------------------------------------
// Multiplication par un scalaire clair : E(m)^k mod n² = E(k·m mod n)
// ---------------------------------------------------------------------------
pub fn p_mul_plain(c: &BigUint, k: &BigUint, pk: &PublicKey) -> Result<BigUint, CryptoError> {
    if c >= &pk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }
    if k >= &pk.n {
        return Err(CryptoError::PlaintextOutOfRange);
    }
    Ok(c.modpow(k, &pk.n_squared))
}
