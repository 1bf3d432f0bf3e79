//! zirkel-cli – Bibliotheks-Root
//!
//! Verdrahtet Konfiguration, Schluesselspeicher und Backend zu einem
//! `Client`, auf dem die Befehle des Binaries aufbauen.

pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use config::ClientConfig;
use zirkel_chat::{ChatSitzung, HttpBackend, KeyService, Provisionierung, SitzungsKontext, Verteilung};
use zirkel_core::{GroupId, UserId};
use zirkel_crypto::{public_key_from_private, AesGcm, MessageCipher, OsZufall};
use zirkel_db::{LocalKeyStore, SqliteKeyValueStore};

pub type Schluesseldienst = KeyService<HttpBackend, SqliteKeyValueStore>;
pub type Sitzung = ChatSitzung<HttpBackend, SqliteKeyValueStore>;

/// Oeffentlicher Schluessel des Geraets
#[derive(Debug, Clone)]
pub struct Schluesselstatus {
    pub public_key: String,
    /// `true`, wenn das Paar gerade erst erzeugt wurde
    pub neu: bool,
}

/// Angemeldeter Client fuer ein Backend
pub struct Client {
    config: ClientConfig,
    kontext: SitzungsKontext,
    keys: Arc<Schluesseldienst>,
}

impl Client {
    /// Oeffnet den Schluesselspeicher des Backends und baut den HTTP-Client
    ///
    /// Es findet noch keine Netzwerkanfrage statt.
    pub async fn verbinden(config: ClientConfig, kontext: SitzungsKontext) -> Result<Self> {
        let backend = Arc::new(HttpBackend::new(
            &config.backend.url,
            config.timeout(),
            kontext.clone(),
        )?);

        let store = SqliteKeyValueStore::fuer_origin(
            &config.speicher.verzeichnis,
            &config.backend.url,
            &config.speicher.name,
        )
        .await
        .context("Schluesselspeicher konnte nicht geoeffnet werden")?;

        let keys = KeyService::mit_cipher(
            backend,
            LocalKeyStore::new(store),
            Arc::new(config.rsa()?),
            Arc::new(OsZufall),
        );

        tracing::debug!(
            backend = %config.backend.url,
            user_id = %kontext.user_id,
            "Client bereit"
        );

        Ok(Self {
            config,
            kontext,
            keys: Arc::new(keys),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Stellt das Schluesselpaar sicher und liefert den oeffentlichen Teil
    pub async fn schluessel(&self) -> Result<Schluesselstatus> {
        match self.keys.schluesselpaar_sicherstellen().await? {
            Provisionierung::Neu { public_key } => Ok(Schluesselstatus {
                public_key,
                neu: true,
            }),
            Provisionierung::Vorhanden => {
                let private_key = self
                    .keys
                    .private_key()
                    .await?
                    .context("Privater Schluessel verschwunden")?;
                Ok(Schluesselstatus {
                    public_key: public_key_from_private(&private_key)?,
                    neu: false,
                })
            }
        }
    }

    /// Erzeugt einen Gruppenschluessel und wickelt ihn fuer die Mitglieder ein
    pub async fn gruppenschluessel(
        &self,
        group_id: &GroupId,
        mitglieder: &[UserId],
    ) -> Result<Verteilung> {
        Ok(self
            .keys
            .gruppenschluessel_verteilen(group_id, mitglieder)
            .await?)
    }

    pub fn sitzung(&self, group_id: GroupId) -> Sitzung {
        ChatSitzung::neu(
            Arc::clone(&self.keys),
            MessageCipher::new(AesGcm, Arc::new(OsZufall), self.config.schluessel_politik()),
            self.kontext.clone(),
            group_id,
        )
    }
}
