//! Lokaler Speicher fuer den privaten Schluessel des Benutzers
//!
//! Es gibt genau einen Eintrag mit der festen ID `userPrivateKey`. Der
//! Schluessel verlaesst das Geraet nie.

use zeroize::Zeroizing;

use crate::error::{SpeicherError, SpeicherResult};
use crate::store::KeyValueStore;

/// Feste ID des Eintrags
pub const PRIVATE_KEY_ID: &str = "userPrivateKey";

/// Speichert und laedt den privaten Schluessel (PEM)
#[derive(Debug)]
pub struct LocalKeyStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> LocalKeyStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Schreibt den privaten Schluessel (ersetzt einen vorhandenen)
    pub async fn put(&self, private_key_pem: &str) -> SpeicherResult<()> {
        if private_key_pem.trim().is_empty() {
            return Err(SpeicherError::UngueltigeDaten(
                "Privater Schluessel darf nicht leer sein".into(),
            ));
        }
        self.store.put(PRIVATE_KEY_ID, private_key_pem).await?;
        tracing::info!("Privater Schluessel gespeichert");
        Ok(())
    }

    /// Laedt den privaten Schluessel oder meldet `NichtGefunden`
    pub async fn get(&self) -> SpeicherResult<Zeroizing<String>> {
        self.get_optional()
            .await?
            .ok_or_else(|| SpeicherError::nicht_gefunden("Kein privater Schluessel gespeichert"))
    }

    /// Laedt den privaten Schluessel, `None` wenn keiner gespeichert ist
    pub async fn get_optional(&self) -> SpeicherResult<Option<Zeroizing<String>>> {
        Ok(self.store.get(PRIVATE_KEY_ID).await?.map(Zeroizing::new))
    }

    /// Entfernt den privaten Schluessel
    pub async fn loeschen(&self) -> SpeicherResult<bool> {
        self.store.delete(PRIVATE_KEY_ID).await
    }

    /// Zugriff auf den darunterliegenden Speicher
    pub fn store(&self) -> &S {
        &self.store
    }
}
