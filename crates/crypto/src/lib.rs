//! # zirkel-crypto
//!
//! Schluesselverwaltung und Nachrichten-Verschluesselung fuer Zirkel.
//!
//! ## Module
//! - `encoding` - Hex, Base64, PEM
//! - `random` - Zufallsquelle (`SecureRandomSource`)
//! - `asymmetric` - RSA-OAEP Schluesselpaare, Einwickeln von Schluesseln
//! - `symmetric` - AES-GCM Nachrichten-Verschluesselung
//! - `group_key` - Gruppenschluessel erzeugen und verteilen
//! - `types` - Gemeinsame Typen (KeyPair, GroupKey, EncryptedPayload)
//! - `error` - Fehlertypen

pub mod asymmetric;
pub mod encoding;
pub mod error;
pub mod group_key;
pub mod random;
pub mod symmetric;
pub mod types;

// Bequeme Re-Exports
pub use asymmetric::{
    public_key_from_private, unwrap, wrap, AsymmetricCipher, OaepHash, RsaOaep, MIN_RSA_BITS,
};
pub use error::{CryptoError, CryptoResult};
pub use group_key::{generate_group_key, unwrap_group_key, wrap_group_key};
pub use random::{OsZufall, SecureRandomSource};
pub use symmetric::{AeadCipher, AesGcm, MessageCipher, SchluesselPolitik};
pub use types::{EncryptedPayload, GroupKey, KeyPair, SecretBytes, NONCE_LEN, TAG_LEN};
