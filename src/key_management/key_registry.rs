// ============================================================================
// KeyRegistry: paire de clés de session partagée entre threads
//
// Arc<RwLock<Option<KeyPair>>> :
//   - Arc    : clonable entre threads
//   - RwLock : chiffrements et déchiffrements concurrents en lecture,
//              écriture exclusive seulement lors d'une rotation
//   - Option : distingue "aucune clé chargée" de "clé chargée"
//
// La KeyPair elle-même est immuable ; le verrou ne protège que son
// remplacement.
// ============================================================================

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use crate::paillier::p_keygen::{PublicKey, SecretKey, KeyPair};

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Aucune clé Paillier n'a encore été chargée dans le registre
    NoPaillierKey,
    /// Le verrou RwLock est empoisonné (thread paniqué pendant une écriture)
    LockPoisoned,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NoPaillierKey =>
                write!(f, "Aucune clé Paillier chargée dans le registre"),
            RegistryError::LockPoisoned =>
                write!(f, "Verrou du registre empoisonné — redémarrage requis"),
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Clone)]
pub struct KeyRegistry {
    inner: Arc<RwLock<Option<KeyPair>>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        KeyRegistry { inner: Arc::new(RwLock::new(None)) }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Option<KeyPair>>, RegistryError> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Option<KeyPair>>, RegistryError> {
        self.inner.read().map_err(|_| RegistryError::LockPoisoned)
    }

    /// Installe (ou remplace) la paire de clés de session.
    pub fn set_keypair(&self, kp: KeyPair) -> Result<(), RegistryError> {
        debug!(modulus_bits = kp.public_key.n().bits(), "paire de clés installée dans le registre");
        *self.write()? = Some(kp);
        Ok(())
    }

    /// Supprime la paire de clés (la zeroization de SecretKey suit via Drop)
    pub fn clear_keypair(&self) -> Result<(), RegistryError> {
        *self.write()? = None;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Clé publique : clonée, elle ne contient rien de secret
    // -----------------------------------------------------------------------
    pub fn public_key(&self) -> Result<PublicKey, RegistryError> {
        self.read()?
            .as_ref()
            .map(|kp| kp.public_key.clone())
            .ok_or(RegistryError::NoPaillierKey)
    }

    // -----------------------------------------------------------------------
    // Prête la clé secrète au closure sans jamais la cloner hors du registre.
    //
    // Usage typique :
    //   let m = registry.with_secret_key(|sk| p_decrypt(&ct, sk))??;
    // -----------------------------------------------------------------------
    pub fn with_secret_key<F, T>(&self, f: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&SecretKey) -> T,
    {
        self.read()?
            .as_ref()
            .map(|kp| f(&kp.secret_key))
            .ok_or(RegistryError::NoPaillierKey)
    }

    pub fn has_keypair(&self) -> Result<bool, RegistryError> {
        Ok(self.read()?.is_some())
    }
}

impl Default for KeyRegistry {
    fn default() -> Self { Self::new() }
}
