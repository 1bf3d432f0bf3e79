//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `ZK_LOG_LEVEL`: Filter (z.B. `debug` oder `zirkel_chat=trace`), Standard: `logging.level`
//!   aus der Konfiguration (`warn`)
//! - `ZK_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Ausgabe geht nach stderr, stdout bleibt fuer die CLI-Ausgabe frei.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LEVEL: &str = "ZK_LOG_LEVEL";
pub const ENV_FORMAT: &str = "ZK_LOG_FORMAT";

/// Abhaengigkeiten, die auf `debug` sehr gespraechig sind
const LEISE_CRATES: &[&str] = &["sqlx=warn", "hyper=warn", "reqwest=warn"];

/// Ausgabeformat der Logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            anders => Err(format!("Unbekanntes Log-Format: {anders}")),
        }
    }
}

/// Initialisiert das Logging-System.
///
/// `ZK_LOG_LEVEL` und `ZK_LOG_FORMAT` haben Vorrang vor den uebergebenen
/// Werten. Liefert `false`, wenn bereits ein Subscriber gesetzt war.
pub fn logging_initialisieren(level: &str, format: LogFormat) -> bool {
    let filter = filter_bauen(std::env::var(ENV_LEVEL).ok().as_deref(), level);
    let format = format_waehlen(format, std::env::var(ENV_FORMAT).ok().as_deref());

    let ergebnis = match format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init(),
    };
    ergebnis.is_ok()
}

fn filter_bauen(aus_env: Option<&str>, konfiguriert: &str) -> EnvFilter {
    let mut filter = aus_env
        .and_then(|s| EnvFilter::try_new(s).ok())
        .or_else(|| EnvFilter::try_new(konfiguriert).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    for direktive in LEISE_CRATES {
        if let Ok(d) = direktive.parse() {
            filter = filter.add_directive(d);
        }
    }
    filter
}

/// Ungueltige Werte in der Umgebung werden ignoriert
fn format_waehlen(konfiguriert: LogFormat, aus_env: Option<&str>) -> LogFormat {
    aus_env
        .and_then(|s| s.parse().ok())
        .unwrap_or(konfiguriert)
}

/// Prueft ob `filter` eine gueltige Filter-Direktive ist (Level oder `ziel=level`)
pub fn log_filter_gueltig(filter: &str) -> bool {
    EnvFilter::try_new(filter).is_ok()
}
