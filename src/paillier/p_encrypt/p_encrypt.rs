use num_bigint::{BigInt, BigUint};
use crate::config::EngineConfig;
use crate::crypto_error::CryptoError;
use crate::paillier::p_keygen::PublicKey;
use crate::paillier::prime_source::{PrimeSource, OsPrimeSource, random_coprime_to, MAX_COPRIME_ATTEMPTS};

// ---------------------------------------------------------------------------
// Chiffrement Paillier : c = g^m * r^n  mod n²
//
// Politique : un message hors de [0, n) est refusé (PlaintextOutOfRange),
// jamais réduit implicitement modulo n.
// ---------------------------------------------------------------------------
pub fn p_encrypt(m: &BigUint, pk: &PublicKey) -> Result<BigUint, CryptoError> {
    p_encrypt_with(m, pk, &mut OsPrimeSource::os(), MAX_COPRIME_ATTEMPTS)
}

/// Chiffre avec le budget de recherche de r fixé par la configuration.
pub fn p_encrypt_with_config(m: &BigUint, pk: &PublicKey, config: &EngineConfig) -> Result<BigUint, CryptoError> {
    let mut source = OsPrimeSource::os().with_attempt_factor(config.prime_attempt_factor);
    p_encrypt_with(m, pk, &mut source, config.coprime_max_attempts)
}

/// Variante signée : tout message négatif est hors domaine.
pub fn p_encrypt_signed(m: &BigInt, pk: &PublicKey) -> Result<BigUint, CryptoError> {
    let m = m.to_biguint().ok_or(CryptoError::PlaintextOutOfRange)?;
    p_encrypt(&m, pk)
}

/// Chiffre `m` en tirant le facteur d'aveuglement depuis `source`.
pub fn p_encrypt_with<S: PrimeSource + ?Sized>(
    m:            &BigUint,
    pk:           &PublicKey,
    source:       &mut S,
    max_attempts: u32,
) -> Result<BigUint, CryptoError> {
    if m >= &pk.n {
        return Err(CryptoError::PlaintextOutOfRange);
    }

    // r premier avec n, 0 < r < n
    let r = random_coprime_to(source, &pk.n, pk.blinding_bits(), max_attempts)?;

    // Chaque exponentiation est réduite modulo n² à chaque étape :
    // les intermédiaires ne dépassent jamais n² quelle que soit la taille de m
    let g_m = pk.g.modpow(m, &pk.n_squared);
    let r_n = r.modpow(&pk.n, &pk.n_squared);
    let c   = (&g_m * &r_n) % &pk.n_squared;

    Ok(c)
}
