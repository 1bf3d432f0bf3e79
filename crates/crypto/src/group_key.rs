//! Gruppenschluessel pro Gruppe
//!
//! Der Ersteller einer Gruppe erzeugt 32 Zufallsbytes und verteilt deren
//! Hex-Darstellung, fuer jedes Mitglied einzeln mit RSA-OAEP eingewickelt.
//! Eine Rotation gibt es nicht, der Schluessel bleibt fuer die Gruppe fest.

use crate::asymmetric::{unwrap, wrap, AsymmetricCipher};
use crate::encoding::bytes_to_hex;
use crate::error::{CryptoError, CryptoResult};
use crate::random::SecureRandomSource;
use crate::types::{GroupKey, SecretBytes};

/// Laenge neuer Gruppenschluessel in Bytes
pub const GROUP_KEY_LEN: usize = 32;

/// Erzeugt einen neuen Gruppenschluessel (64 Hex-Zeichen, Kleinbuchstaben)
pub fn generate_group_key(zufall: &dyn SecureRandomSource) -> CryptoResult<GroupKey> {
    let mut bytes = SecretBytes::new(vec![0u8; GROUP_KEY_LEN]);
    zufall.fill(bytes.as_bytes_mut())?;
    GroupKey::from_hex(&bytes_to_hex(bytes.as_bytes()))
}

/// Wickelt die Hex-Darstellung des Gruppenschluessels fuer einen Empfaenger ein
pub fn wrap_group_key<A: AsymmetricCipher + ?Sized>(
    cipher: &A,
    group_key: &GroupKey,
    recipient_public_key_pem: &str,
) -> CryptoResult<String> {
    wrap(cipher, group_key.as_hex().as_bytes(), recipient_public_key_pem)
}

/// Wickelt einen Gruppenschluessel mit dem eigenen privaten Schluessel aus
///
/// Ist der ausgewickelte Inhalt kein gueltiger Hex-Schluessel, wird das als
/// `EntschluesselungFehlgeschlagen` gemeldet und niemals durch einen
/// Ersatzschluessel ueberdeckt.
pub fn unwrap_group_key<A: AsymmetricCipher + ?Sized>(
    cipher: &A,
    wrapped_b64: &str,
    private_key_pem: &str,
) -> CryptoResult<GroupKey> {
    let inhalt = SecretBytes::new(unwrap(cipher, wrapped_b64, private_key_pem)?);
    let hex_key = std::str::from_utf8(inhalt.as_bytes()).map_err(|_| {
        CryptoError::EntschluesselungFehlgeschlagen("Gruppenschluessel ist kein Text".into())
    })?;
    GroupKey::from_hex(hex_key.trim()).map_err(|e| {
        CryptoError::EntschluesselungFehlgeschlagen(format!("Gruppenschluessel unbrauchbar: {e}"))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
