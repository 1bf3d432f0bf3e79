//! zirkel-core – Gemeinsame Typen fuer Zirkel
//!
//! Dieses Crate stellt die IDs und die Datenmodelle bereit, die zwischen
//! Client-Kern und Backend ausgetauscht werden. Es enthaelt keine
//! Kryptografie und keine IO.

pub mod model;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use model::{
    EncryptedMessage, GroupDetails, GroupMember, NewMessage, WrappedGroupKey,
};
pub use types::{GroupId, UserId};
