pub mod key_registry;

pub use key_registry::{KeyRegistry, RegistryError};
