//! zirkel-db – Lokaler Schluesselspeicher
//!
//! Dieses Crate stellt den `KeyValueStore`-Trait bereit sowie zwei
//! Implementierungen: SQLite (persistent, pro Backend-Origin) und
//! In-Memory (Tests). Darauf baut `LocalKeyStore` auf, der genau den
//! privaten Schluessel des Benutzers verwaltet.

pub mod error;
pub mod key_store;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use error::{SpeicherError, SpeicherResult};
pub use key_store::{LocalKeyStore, PRIVATE_KEY_ID};
pub use memory::InMemoryStore;
pub use sqlite::pool::STORE_NAME;
pub use sqlite::SqliteKeyValueStore;
pub use store::{origin_schluessel, KeyValueStore};
