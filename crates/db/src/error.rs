//! Fehlertypen fuer das Speicher-Crate

use thiserror::Error;

/// Speicher-Fehlertypen
#[derive(Debug, Error)]
pub enum SpeicherError {
    #[error("Eintrag nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    #[error("SQLx-Fehler: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration-Fehler: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeicherError {
    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::NichtGefunden(msg.into())
    }
}

pub type SpeicherResult<T> = Result<T, SpeicherError>;
