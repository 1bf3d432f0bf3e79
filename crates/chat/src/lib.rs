//! zirkel-chat – Gruppenschluessel und verschluesselter Gruppenchat
//!
//! Dieses Crate implementiert:
//! - Backend: Trait fuer den Server-Zugriff, `HttpBackend` ueber reqwest
//! - KeyService: Schluesselpaar des Geraets, oeffentliche Schluessel, Wrap/Unwrap
//! - GroupKeyResolver: eingewickelten Gruppenschluessel holen und auswickeln
//! - ChatSitzung: Verlauf entschluesseln, Nachrichten verschluesselt senden
//!
//! # Beispiel
//!
//! ```no_run
//! use std::sync::Arc;
//! use zirkel_chat::{ChatSitzung, HttpBackend, KeyService, SitzungsKontext, STANDARD_TIMEOUT};
//! use zirkel_crypto::MessageCipher;
//! use zirkel_db::{LocalKeyStore, SqliteKeyValueStore, STORE_NAME};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "https://chat.example.org";
//!     let kontext = SitzungsKontext::new("u-1", "token");
//!     let backend = Arc::new(HttpBackend::new(url, STANDARD_TIMEOUT, kontext.clone())?);
//!
//!     let store = SqliteKeyValueStore::fuer_origin("daten".as_ref(), url, STORE_NAME).await?;
//!     let keys = Arc::new(KeyService::neu(backend, LocalKeyStore::new(store)));
//!     keys.schluesselpaar_sicherstellen().await?;
//!
//!     let sitzung = ChatSitzung::neu(keys, MessageCipher::default(), kontext, "g-1".into());
//!     for nachricht in sitzung.verlauf().await? {
//!         println!("{}: {:?}", nachricht.sender_name, nachricht.inhalt);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod distribution;
pub mod error;
pub mod http;
pub mod key_service;
pub mod resolver;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use api::Backend;
pub use error::{ChatError, ChatResult};
pub use http::{HttpBackend, STANDARD_TIMEOUT};
pub use key_service::KeyService;
pub use resolver::GroupKeyResolver;
pub use service::ChatSitzung;
pub use types::{
    ChatNachricht, NachrichtenInhalt, Provisionierung, SitzungsKontext, Verteilung,
    UNBEKANNTER_BENUTZER,
};
