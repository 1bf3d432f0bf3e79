//! RSA-OAEP: Schluesselpaare und Einwickeln von Schluesselmaterial
//!
//! Jeder Benutzer hat ein RSA-Schluesselpaar. Der Gruppenschluessel wird
//! fuer jedes Mitglied einzeln mit dessen oeffentlichem Schluessel
//! verschluesselt ("eingewickelt").
//!
//! ## Format
//! ```text
//! wrap(m) = Base64( RSA-OAEP( Base64(m) ) )
//! ```
//!
//! Das innere Base64 stammt aus dem Web-Client und bleibt fuer die
//! Kompatibilitaet mit vorhandenen Schluesseln erhalten. Ohne OAEP-Padding
//! (roh oder PKCS#1 v1.5) wird grundsaetzlich nicht verschluesselt.

use std::sync::Arc;

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::encoding::{base64_to_bytes, bytes_to_base64, parse_pem};
use crate::error::{CryptoError, CryptoResult};
use crate::random::{csprng_aus_quelle, OsZufall, SecureRandomSource};
use crate::types::KeyPair;

/// Mindestgroesse fuer RSA-Moduli in Bit
pub const MIN_RSA_BITS: usize = 2048;

/// Asymmetrische Verschluesselung als austauschbare Faehigkeit
pub trait AsymmetricCipher: Send + Sync {
    /// Erzeugt ein neues Schluesselpaar
    fn generate_key_pair(&self) -> CryptoResult<KeyPair>;

    /// Verschluesselt `plaintext` fuer den Inhaber von `public_key_pem`
    fn encrypt(&self, public_key_pem: &str, plaintext: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Entschluesselt mit dem eigenen privaten Schluessel
    fn decrypt(&self, private_key_pem: &str, ciphertext: &[u8]) -> CryptoResult<Vec<u8>>;
}

/// Hash-Funktion fuer OAEP (und MGF1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OaepHash {
    /// Standard von node-forge, kompatibel mit vorhandenen Schluesseln
    #[default]
    Sha1,
    Sha256,
}

impl OaepHash {
    fn padding(self) -> Oaep {
        match self {
            Self::Sha1 => Oaep::new::<sha1::Sha1>(),
            Self::Sha256 => Oaep::new::<sha2::Sha256>(),
        }
    }
}

/// RSA mit OAEP-Padding
pub struct RsaOaep {
    bits: usize,
    hash: OaepHash,
    zufall: Arc<dyn SecureRandomSource>,
}

impl std::fmt::Debug for RsaOaep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaOaep")
            .field("bits", &self.bits)
            .field("hash", &self.hash)
            .finish()
    }
}

impl Default for RsaOaep {
    fn default() -> Self {
        Self {
            bits: MIN_RSA_BITS,
            hash: OaepHash::default(),
            zufall: Arc::new(OsZufall),
        }
    }
}

impl RsaOaep {
    /// Erstellt eine Instanz mit eigener Schluesselgroesse und Hash
    ///
    /// Schluessel unter 2048 Bit werden abgelehnt.
    pub fn new(
        bits: usize,
        hash: OaepHash,
        zufall: Arc<dyn SecureRandomSource>,
    ) -> CryptoResult<Self> {
        if bits < MIN_RSA_BITS {
            return Err(CryptoError::UngueltigerSchluessel(format!(
                "RSA mit {bits} Bit ist zu schwach (mindestens {MIN_RSA_BITS})"
            )));
        }
        Ok(Self { bits, hash, zufall })
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn hash(&self) -> OaepHash {
        self.hash
    }
}

impl AsymmetricCipher for RsaOaep {
    fn generate_key_pair(&self) -> CryptoResult<KeyPair> {
        let mut rng = csprng_aus_quelle(self.zufall.as_ref())?;
        let private = RsaPrivateKey::new(&mut rng, self.bits)
            .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;
        let public = RsaPublicKey::from(&private);

        let private_key = private
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;
        let public_key = public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;

        tracing::debug!(bits = self.bits, "RSA-Schluesselpaar erzeugt");
        Ok(KeyPair {
            public_key,
            private_key,
        })
    }

    fn encrypt(&self, public_key_pem: &str, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let public = parse_public_key(public_key_pem)?;
        if public.size() * 8 < MIN_RSA_BITS {
            return Err(CryptoError::UngueltigerSchluessel(format!(
                "Oeffentlicher Schluessel mit {} Bit ist zu schwach",
                public.size() * 8
            )));
        }

        let mut rng = csprng_aus_quelle(self.zufall.as_ref())?;
        public
            .encrypt(&mut rng, self.hash.padding(), plaintext)
            .map_err(|e| CryptoError::Verschluesselung(e.to_string()))
    }

    fn decrypt(&self, private_key_pem: &str, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        let private = parse_private_key(private_key_pem)?;
        private
            .decrypt(self.hash.padding(), ciphertext)
            .map_err(|e| CryptoError::EntschluesselungFehlgeschlagen(e.to_string()))
    }
}

/// Liest einen oeffentlichen Schluessel (SPKI oder PKCS#1)
pub fn parse_public_key(pem: &str) -> CryptoResult<RsaPublicKey> {
    let block = parse_pem(pem)?;
    let ergebnis = match block.label.as_str() {
        "PUBLIC KEY" => RsaPublicKey::from_public_key_der(&block.der).map_err(|e| e.to_string()),
        "RSA PUBLIC KEY" => RsaPublicKey::from_pkcs1_der(&block.der).map_err(|e| e.to_string()),
        andere => Err(format!("unerwartetes PEM-Label '{andere}'")),
    };
    ergebnis.map_err(CryptoError::UngueltigerSchluessel)
}

/// Liest einen privaten Schluessel (PKCS#8 oder PKCS#1, wie node-forge ihn schreibt)
pub fn parse_private_key(pem: &str) -> CryptoResult<RsaPrivateKey> {
    let block = parse_pem(pem)?;
    let ergebnis = match block.label.as_str() {
        "PRIVATE KEY" => RsaPrivateKey::from_pkcs8_der(&block.der).map_err(|e| e.to_string()),
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(&block.der).map_err(|e| e.to_string()),
        andere => Err(format!("unerwartetes PEM-Label '{andere}'")),
    };
    ergebnis.map_err(CryptoError::UngueltigerSchluessel)
}

/// Leitet den oeffentlichen Schluessel (SPKI-PEM) aus einem privaten ab
pub fn public_key_from_private(private_key_pem: &str) -> CryptoResult<String> {
    let private = parse_private_key(private_key_pem)?;
    RsaPublicKey::from(&private)
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))
}

/// Wickelt Schluesselmaterial fuer einen Empfaenger ein
///
/// Ergebnis: Base64(RSA-OAEP(Base64(plaintext)))
pub fn wrap<A: AsymmetricCipher + ?Sized>(
    cipher: &A,
    plaintext: &[u8],
    recipient_public_key_pem: &str,
) -> CryptoResult<String> {
    let innen = bytes_to_base64(plaintext);
    let chiffrat = cipher.encrypt(recipient_public_key_pem, innen.as_bytes())?;
    Ok(bytes_to_base64(&chiffrat))
}

/// Umkehrung von [`wrap`]
///
/// Jedes Problem mit dem Chiffrat (kaputtes Base64, OAEP-Pruefung,
/// falsches Schluesselpaar) ergibt `EntschluesselungFehlgeschlagen`.
/// Nur ein unlesbarer privater Schluessel wird als solcher gemeldet.
pub fn unwrap<A: AsymmetricCipher + ?Sized>(
    cipher: &A,
    wrapped_b64: &str,
    private_key_pem: &str,
) -> CryptoResult<Vec<u8>> {
    let chiffrat = base64_to_bytes(wrapped_b64).map_err(|e| {
        CryptoError::EntschluesselungFehlgeschlagen(format!("Chiffrat nicht lesbar: {e}"))
    })?;
    let innen = zeroize::Zeroizing::new(cipher.decrypt(private_key_pem, &chiffrat)?);
    let innen = std::str::from_utf8(&innen).map_err(|_| {
        CryptoError::EntschluesselungFehlgeschlagen("Inhalt ist kein Base64-Text".into())
    })?;
    base64_to_bytes(innen).map_err(|_| {
        CryptoError::EntschluesselungFehlgeschlagen("Inhalt ist kein Base64-Text".into())
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
