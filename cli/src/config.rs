//! Client-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Client ohne Konfigurationsdatei
//! lauffaehig ist.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zirkel_crypto::{OaepHash, OsZufall, RsaOaep, SchluesselPolitik, MIN_RSA_BITS};
use zirkel_db::STORE_NAME;
use zirkel_observability::{log_filter_gueltig, LogFormat};

/// Vollstaendige Client-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Verbindung zum Gruppen-Backend
    pub backend: BackendEinstellungen,
    /// Lokaler Schluesselspeicher
    pub speicher: SpeicherEinstellungen,
    /// Kryptografie-Parameter
    pub krypto: KryptoEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendEinstellungen {
    /// Basis-URL, z.B. `https://chat.example.org/api`
    pub url: String,
    /// Timeout pro Anfrage in Sekunden
    pub timeout_sek: u64,
}

impl Default for BackendEinstellungen {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".into(),
            timeout_sek: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeicherEinstellungen {
    /// Basisverzeichnis; darunter ein Unterordner pro Backend-Origin
    pub verzeichnis: PathBuf,
    /// Name der Datenbankdatei (ohne Endung)
    pub name: String,
}

impl Default for SpeicherEinstellungen {
    fn default() -> Self {
        Self {
            verzeichnis: PathBuf::from("zirkel-daten"),
            name: STORE_NAME.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KryptoEinstellungen {
    /// Groesse neuer RSA-Schluessel (mindestens 2048)
    pub rsa_bits: usize,
    /// OAEP-Hash: "sha1" (kompatibel mit dem Web-Client) oder "sha256"
    pub oaep_hash: OaepHash,
    /// Gruppenschluessel mit 16 Bytes (AES-128) akzeptieren
    pub erlaube_aes128: bool,
}

impl Default for KryptoEinstellungen {
    fn default() -> Self {
        Self {
            rsa_bits: MIN_RSA_BITS,
            oaep_hash: OaepHash::default(),
            erlaube_aes128: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level oder Filter: "info", "debug", "zirkel_chat=trace" ...
    pub level: String,
    /// Format: "text" oder "json"
    pub format: LogFormat,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: LogFormat::Text,
        }
    }
}

impl ClientConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str::<Self>(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
                ))
            }
        };
        config.validieren()?;
        Ok(config)
    }

    pub fn validieren(&self) -> anyhow::Result<()> {
        if self.krypto.rsa_bits < MIN_RSA_BITS {
            anyhow::bail!(
                "krypto.rsa_bits = {} ist zu klein (mindestens {MIN_RSA_BITS})",
                self.krypto.rsa_bits
            );
        }
        if self.backend.url.trim().is_empty() {
            anyhow::bail!("backend.url darf nicht leer sein");
        }
        if self.backend.timeout_sek == 0 {
            anyhow::bail!("backend.timeout_sek muss groesser als 0 sein");
        }
        if self.speicher.name.trim().is_empty() {
            anyhow::bail!("speicher.name darf nicht leer sein");
        }
        if !log_filter_gueltig(&self.logging.level) {
            anyhow::bail!("logging.level = '{}' ist kein gueltiger Filter", self.logging.level);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_sek)
    }

    pub fn schluessel_politik(&self) -> SchluesselPolitik {
        if self.krypto.erlaube_aes128 {
            SchluesselPolitik::Aes128Erlaubt
        } else {
            SchluesselPolitik::NurAes256
        }
    }

    /// RSA-OAEP mit den konfigurierten Parametern
    pub fn rsa(&self) -> anyhow::Result<RsaOaep> {
        Ok(RsaOaep::new(
            self.krypto.rsa_bits,
            self.krypto.oaep_hash,
            Arc::new(OsZufall),
        )?)
    }
}
