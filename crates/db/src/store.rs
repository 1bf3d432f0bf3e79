//! Key-Value-Speicher als austauschbare Faehigkeit
//!
//! Der Client braucht genau eine logische Tabelle mit String-Schluesseln.
//! Jede Schreiboperation ist atomar: entweder steht danach der neue Wert
//! vollstaendig im Speicher oder der alte bleibt unveraendert.

use crate::error::SpeicherResult;

/// Persistenter Key-Value-Speicher
#[allow(async_fn_in_trait)]
pub trait KeyValueStore: Send + Sync {
    /// Schreibt `value` unter `id` (ueberschreibt vorhandene Werte)
    async fn put(&self, id: &str, value: &str) -> SpeicherResult<()>;

    /// Liest den Wert unter `id`
    async fn get(&self, id: &str) -> SpeicherResult<Option<String>>;

    /// Entfernt den Eintrag, `true` wenn etwas geloescht wurde
    async fn delete(&self, id: &str) -> SpeicherResult<bool>;
}

/// Leitet aus einer Backend-URL einen Verzeichnisnamen ab
///
/// Schema, Host und Port bilden den Origin; Pfad, Query und Benutzerdaten
/// werden ignoriert. Zeichen ausserhalb von `[A-Za-z0-9.-]` werden zu `_`.
///
/// ```
/// use zirkel_db::origin_schluessel;
/// assert_eq!(
///     origin_schluessel("https://api.example.org/v1"),
///     "https_api.example.org"
/// );
/// ```
pub fn origin_schluessel(url: &str) -> String {
    let (schema, rest) = url.split_once("://").unwrap_or(("http", url));
    let authority = rest.split(&['/', '?', '#'][..]).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();

    let roh = format!("{}_{}", schema.to_ascii_lowercase(), host_port.to_ascii_lowercase());
    roh.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
