// ============================================================================
// Configuration du moteur Paillier
//
// Sources, par ordre de priorité croissante :
//   1. valeurs par défaut (premiers de 256 bits, 1000 tirages de r)
//   2. fichier JSON optionnel
//   3. variables d'environnement PAILLIER_*
// ============================================================================

use serde::{Serialize, Deserialize};
use std::fs;
use std::io;
use crate::crypto_error::CryptoError;
use crate::paillier::p_keygen::{MIN_PRIME_BITS, RECOMMENDED_PRIME_BITS};
use crate::paillier::prime_source::{MAX_COPRIME_ATTEMPTS, DEFAULT_PRIME_ATTEMPT_FACTOR};

pub const ENV_PRIME_BITS:           &str = "PAILLIER_PRIME_BITS";
pub const ENV_COPRIME_MAX_ATTEMPTS: &str = "PAILLIER_COPRIME_MAX_ATTEMPTS";

/// Un fichier de configuration tient en quelques centaines d'octets
const MAX_CONFIG_FILE_BYTES: u64 = 4_096;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Taille de p et q en bits (n en a le double)
    pub prime_bits:           u64,
    /// Plafond de tirages pour le facteur d'aveuglement
    pub coprime_max_attempts: u32,
    /// Budget de candidats premiers par bit demandé
    pub prime_attempt_factor: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            prime_bits:           RECOMMENDED_PRIME_BITS,
            coprime_max_attempts: MAX_COPRIME_ATTEMPTS,
            prime_attempt_factor: DEFAULT_PRIME_ATTEMPT_FACTOR,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.prime_bits < MIN_PRIME_BITS {
            return Err(CryptoError::KeySizeTooSmall {
                requested: self.prime_bits,
                minimum:   MIN_PRIME_BITS,
            });
        }
        if self.coprime_max_attempts == 0 {
            return Err(CryptoError::InvalidConfig("coprime_max_attempts doit être > 0".into()));
        }
        if self.prime_attempt_factor == 0 {
            return Err(CryptoError::InvalidConfig("prime_attempt_factor doit être > 0".into()));
        }
        Ok(())
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CryptoError> {
        let config: EngineConfig = serde_json::from_str(raw)
            .map_err(|e| CryptoError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Charge un fichier JSON. La taille est vérifiée AVANT la lecture.
    pub fn load_json(filepath: &str) -> io::Result<Self> {
        let meta = fs::metadata(filepath)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Fichier de configuration trop grand : {} octets (maximum autorisé : {} octets)",
                    meta.len(),
                    MAX_CONFIG_FILE_BYTES
                ),
            ));
        }
        let raw = fs::read_to_string(filepath)?;
        Self::from_json_str(&raw)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Applique les surcharges PAILLIER_* présentes dans l'environnement.
    pub fn with_env_overrides(self) -> Result<Self, CryptoError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, CryptoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_PRIME_BITS) {
            self.prime_bits = raw.trim().parse()
                .map_err(|_| CryptoError::InvalidConfig(format!("{ENV_PRIME_BITS} invalide : {raw}")))?;
        }
        if let Some(raw) = lookup(ENV_COPRIME_MAX_ATTEMPTS) {
            self.coprime_max_attempts = raw.trim().parse()
                .map_err(|_| CryptoError::InvalidConfig(format!("{ENV_COPRIME_MAX_ATTEMPTS} invalide : {raw}")))?;
        }
        self.validate()?;
        Ok(self)
    }
}
