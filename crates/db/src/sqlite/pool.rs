//! SQLite-Key-Value-Speicher mit WAL-Modus

use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use crate::error::SpeicherResult;
use crate::store::{origin_schluessel, KeyValueStore};

/// Dateiname (ohne Endung) des Schluesselspeichers
pub const STORE_NAME: &str = "cryptoKeys";

/// Wrapper um den SQLite Connection Pool
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Oeffnet (oder erstellt) die Datenbankdatei und fuehrt Migrationen aus
    pub async fn oeffnen(pfad: &Path) -> SpeicherResult<Self> {
        if let Some(parent) = pfad.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(pfad)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        info!(pfad = %pfad.display(), "Schluesselspeicher geoeffnet");

        let store = Self { pool };
        store.migrationen_ausfuehren().await?;
        Ok(store)
    }

    /// Oeffnet den Speicher fuer einen Backend-Origin
    ///
    /// Liegt unter `<daten_dir>/<origin>/<name>.db`, so dass verschiedene
    /// Backends nie denselben privaten Schluessel sehen.
    pub async fn fuer_origin(
        daten_dir: &Path,
        backend_url: &str,
        name: &str,
    ) -> SpeicherResult<Self> {
        let pfad = daten_dir
            .join(origin_schluessel(backend_url))
            .join(format!("{name}.db"));
        Self::oeffnen(&pfad).await
    }

    /// Fuehrt alle ausstehenden Migrationen aus
    pub async fn migrationen_ausfuehren(&self) -> SpeicherResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("Speicher-Migrationen abgeschlossen");
        Ok(())
    }

    /// Gibt den internen Pool zurueck (fuer Tests)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Erstellt eine In-Memory-Datenbank fuer Tests
    pub async fn in_memory() -> SpeicherResult<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            // In-Memory benoetigt mindestens 1 persistente Verbindung
            .min_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrationen_ausfuehren().await?;
        Ok(store)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    async fn put(&self, id: &str, value: &str) -> SpeicherResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO keys (id, key, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET key = excluded.key, updated_at = excluded.updated_at",
        )
        .bind(id)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(id, "Eintrag geschrieben");
        Ok(())
    }

    async fn get(&self, id: &str) -> SpeicherResult<Option<String>> {
        let row = sqlx::query("SELECT key FROM keys WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.try_get::<String, _>("key")).transpose()?)
    }

    async fn delete(&self, id: &str) -> SpeicherResult<bool> {
        let affected = sqlx::query("DELETE FROM keys WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}
