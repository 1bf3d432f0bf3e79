//! Fehlertypen fuer das Kryptografie-Subsystem

use thiserror::Error;

/// Fehler im Kryptografie-Subsystem
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Hex, Base64 oder PEM ist fehlerhaft
    #[error("Ungueltige Kodierung: {0}")]
    UngueltigeKodierung(String),

    /// Schluessel hat falsche Laenge oder ist nicht lesbar
    #[error("Ungueltiger Schluessel: {0}")]
    UngueltigerSchluessel(String),

    #[error("Schluessel-Generierung fehlgeschlagen: {0}")]
    SchluesselGenerierung(String),

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    /// OAEP-Pruefung fehlgeschlagen oder Chiffrat nicht fuer dieses Schluesselpaar
    #[error("Entschluesselung fehlgeschlagen: {0}")]
    EntschluesselungFehlgeschlagen(String),

    /// Auth-Tag stimmt nicht (manipuliert oder falscher Schluessel)
    #[error("Authentifizierung fehlgeschlagen: Auth-Tag ungueltig")]
    AuthentifizierungFehlgeschlagen,

    #[error("Zufallsquelle nicht verfuegbar: {0}")]
    Zufall(String),
}

impl From<base64::DecodeError> for CryptoError {
    fn from(e: base64::DecodeError) -> Self {
        Self::UngueltigeKodierung(format!("Base64: {e}"))
    }
}

impl From<hex::FromHexError> for CryptoError {
    fn from(e: hex::FromHexError) -> Self {
        Self::UngueltigeKodierung(format!("Hex: {e}"))
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;
