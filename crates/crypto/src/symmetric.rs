//! Nachrichten-Verschluesselung mit dem Gruppenschluessel
//!
//! ## Format
//! ```text
//! Base64( [nonce(12)] [ciphertext] [auth_tag(16)] )
//! ```
//!
//! Die Nonce kommt bei jedem Aufruf frisch aus der `SecureRandomSource`.
//! Eine Nonce darf unter demselben Schluessel nie zweimal vorkommen, daher
//! gibt es keinen Zaehler und keine Ableitung aus dem Inhalt.

use std::sync::Arc;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::encoding::{base64_to_bytes, bytes_to_base64, hex_to_bytes};
use crate::error::{CryptoError, CryptoResult};
use crate::random::{zufalls_array, OsZufall, SecureRandomSource};
use crate::types::{EncryptedPayload, NONCE_LEN};

/// AEAD-Primitive als austauschbare Faehigkeit
pub trait AeadCipher: Send + Sync {
    /// Verschluesselt und haengt den Auth-Tag an
    fn seal(&self, key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Prueft den Auth-Tag und entschluesselt
    fn open(&self, key: &[u8], nonce: &[u8; NONCE_LEN], ciphertext: &[u8])
        -> CryptoResult<Vec<u8>>;
}

/// AES-GCM mit 128-Bit-Tag; die Variante ergibt sich aus der Schluessellaenge
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcm;

impl AeadCipher for AesGcm {
    fn seal(&self, key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let nonce = Nonce::from_slice(nonce);
        let ergebnis = match key.len() {
            32 => Aes256Gcm::new_from_slice(key)
                .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?
                .encrypt(nonce, plaintext),
            16 => Aes128Gcm::new_from_slice(key)
                .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?
                .encrypt(nonce, plaintext),
            n => return Err(falsche_laenge(n)),
        };
        ergebnis.map_err(|e| CryptoError::Verschluesselung(e.to_string()))
    }

    fn open(
        &self,
        key: &[u8],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let nonce = Nonce::from_slice(nonce);
        let ergebnis = match key.len() {
            32 => Aes256Gcm::new_from_slice(key)
                .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?
                .decrypt(nonce, ciphertext),
            16 => Aes128Gcm::new_from_slice(key)
                .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?
                .decrypt(nonce, ciphertext),
            n => return Err(falsche_laenge(n)),
        };
        ergebnis.map_err(|_| CryptoError::AuthentifizierungFehlgeschlagen)
    }
}

fn falsche_laenge(n: usize) -> CryptoError {
    CryptoError::UngueltigerSchluessel(format!("Schluessel mit {n} Bytes (erwartet 32)"))
}

/// Welche Schluessellaengen der `MessageCipher` akzeptiert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchluesselPolitik {
    /// Nur 32-Byte-Schluessel (AES-256-GCM)
    #[default]
    NurAes256,
    /// Zusaetzlich 16-Byte-Altschluessel (AES-128-GCM)
    Aes128Erlaubt,
}

impl SchluesselPolitik {
    fn erlaubt(self, len: usize) -> bool {
        match self {
            Self::NurAes256 => len == 32,
            Self::Aes128Erlaubt => len == 32 || len == 16,
        }
    }
}

/// Ver- und Entschluesselt Nachrichteninhalte mit einem Hex-Gruppenschluessel
pub struct MessageCipher<A: AeadCipher = AesGcm> {
    aead: A,
    zufall: Arc<dyn SecureRandomSource>,
    politik: SchluesselPolitik,
}

impl Default for MessageCipher<AesGcm> {
    fn default() -> Self {
        Self::new(AesGcm, Arc::new(OsZufall), SchluesselPolitik::default())
    }
}

impl<A: AeadCipher> std::fmt::Debug for MessageCipher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCipher")
            .field("politik", &self.politik)
            .finish()
    }
}

impl<A: AeadCipher> MessageCipher<A> {
    pub fn new(aead: A, zufall: Arc<dyn SecureRandomSource>, politik: SchluesselPolitik) -> Self {
        Self {
            aead,
            zufall,
            politik,
        }
    }

    pub fn politik(&self) -> SchluesselPolitik {
        self.politik
    }

    /// Verschluesselt `plaintext` und liefert Base64(nonce ‖ ciphertext ‖ tag)
    pub fn encrypt(&self, plaintext: &[u8], hex_key: &str) -> CryptoResult<String> {
        let key = self.schluessel(hex_key)?;
        let nonce: [u8; NONCE_LEN] = zufalls_array(self.zufall.as_ref())?;
        let ciphertext = self.aead.seal(&key, &nonce, plaintext)?;
        Ok(bytes_to_base64(
            &EncryptedPayload { nonce, ciphertext }.to_bytes(),
        ))
    }

    /// Entschluesselt Base64(nonce ‖ ciphertext ‖ tag)
    ///
    /// Manipulierte Daten oder ein falscher Schluessel ergeben
    /// `AuthentifizierungFehlgeschlagen`.
    pub fn decrypt(&self, payload_b64: &str, hex_key: &str) -> CryptoResult<Vec<u8>> {
        let key = self.schluessel(hex_key)?;
        let payload = EncryptedPayload::from_bytes(&base64_to_bytes(payload_b64)?)?;
        self.aead.open(&key, &payload.nonce, &payload.ciphertext)
    }

    /// Wie [`Self::decrypt`], erwartet aber UTF-8-Text
    pub fn decrypt_text(&self, payload_b64: &str, hex_key: &str) -> CryptoResult<String> {
        let bytes = self.decrypt(payload_b64, hex_key)?;
        String::from_utf8(bytes)
            .map_err(|_| CryptoError::UngueltigeKodierung("Klartext ist kein UTF-8".into()))
    }

    fn schluessel(&self, hex_key: &str) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let key = Zeroizing::new(hex_to_bytes(hex_key).map_err(|_| {
            CryptoError::UngueltigerSchluessel("Gruppenschluessel ist kein Hex".into())
        })?);
        if !self.politik.erlaubt(key.len()) {
            return Err(falsche_laenge(key.len()));
        }
        Ok(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
