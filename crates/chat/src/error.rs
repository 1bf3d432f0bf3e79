//! Fehlertypen fuer das Chat-Crate

use thiserror::Error;
use zirkel_crypto::CryptoError;
use zirkel_db::SpeicherError;

/// Chat-Fehlertypen
#[derive(Debug, Error)]
pub enum ChatError {
    /// Das Backend kennt die angefragte Ressource nicht
    #[error("Nicht gefunden: {0}")]
    NichtGefunden(String),

    /// Netzwerk-, Server- oder Formatfehler beim Abruf
    #[error("Abruf fehlgeschlagen: {0}")]
    AbrufFehlgeschlagen(String),

    #[error("Kein privater Schluessel auf diesem Geraet")]
    KeinPrivaterSchluessel,

    #[error("Gruppenschluessel fuer {group_id} nicht verfuegbar: {grund}")]
    GruppenschluesselNichtVerfuegbar { group_id: String, grund: String },

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("Krypto-Fehler: {0}")]
    Krypto(#[from] CryptoError),

    #[error("Speicher-Fehler: {0}")]
    Speicher(#[from] SpeicherError),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl ChatError {
    /// Ob ein erneuter Versuch (durch den Aufrufer) Erfolg haben koennte
    pub fn ist_wiederholbar(&self) -> bool {
        matches!(self, ChatError::AbrufFehlgeschlagen(_))
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
