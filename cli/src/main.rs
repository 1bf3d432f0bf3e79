//! Zirkel CLI – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und fuehrt den
//! gewaehlten Befehl aus.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use zirkel_chat::{NachrichtenInhalt, SitzungsKontext};
use zirkel_cli::{config::ClientConfig, Client};
use zirkel_core::{GroupId, UserId};
use zirkel_observability::logging_initialisieren;

#[derive(Parser)]
#[command(name = "zirkel")]
#[command(about = "Ende-zu-Ende-verschluesselter Gruppenchat", long_about = None)]
#[command(version)]
struct Cli {
    /// Pfad zur Konfigurationsdatei
    #[arg(long, env = "ZK_CONFIG", default_value = "zirkel.toml")]
    config: String,

    /// Benutzer-ID der angemeldeten Sitzung
    #[arg(long, env = "ZK_USER_ID")]
    user_id: String,

    /// Bearer-Token der angemeldeten Sitzung
    #[arg(long, env = "ZK_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    befehl: Befehl,
}

#[derive(Subcommand)]
enum Befehl {
    /// Schluesselpaar sicherstellen und oeffentlichen Schluessel ausgeben
    Schluessel,

    /// Neuen Gruppenschluessel erzeugen und fuer die Mitglieder einwickeln
    Gruppenschluessel {
        /// Gruppen-ID
        group: String,
        /// Benutzer-IDs der Mitglieder
        #[arg(required = true)]
        mitglieder: Vec<String>,
    },

    /// Nachrichtenverlauf einer Gruppe entschluesselt ausgeben
    Verlauf {
        /// Gruppen-ID
        group: String,
    },

    /// Nachricht verschluesselt an eine Gruppe senden
    Senden {
        /// Gruppen-ID
        group: String,
        /// Nachrichtentext
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ClientConfig::laden(&cli.config)?;
    logging_initialisieren(&config.logging.level, config.logging.format);

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config,
        "Zirkel wird initialisiert"
    );

    let kontext = SitzungsKontext::new(cli.user_id, cli.token);
    let client = Client::verbinden(config, kontext).await?;

    match cli.befehl {
        Befehl::Schluessel => {
            let status = client.schluessel().await?;
            if status.neu {
                eprintln!("Neues Schluesselpaar erzeugt. Oeffentlichen Schluessel beim Backend registrieren:");
            }
            print!("{}", status.public_key);
        }

        Befehl::Gruppenschluessel { group, mitglieder } => {
            let mitglieder: Vec<UserId> = mitglieder.into_iter().map(UserId::from).collect();
            let verteilung = client
                .gruppenschluessel(&GroupId::from(group), &mitglieder)
                .await?;

            for (user_id, grund) in &verteilung.fehlgeschlagen {
                eprintln!("Nicht verteilt an {user_id}: {grund}");
            }
            let json = serde_json::to_string_pretty(&verteilung.verpackt)
                .context("Ausgabe konnte nicht serialisiert werden")?;
            println!("{json}");
        }

        Befehl::Verlauf { group } => {
            let sitzung = client.sitzung(GroupId::from(group));
            for nachricht in sitzung.verlauf().await? {
                let zeit = nachricht
                    .timestamp
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "--".into());
                let text = match &nachricht.inhalt {
                    NachrichtenInhalt::Lesbar(text) => text.as_str(),
                    NachrichtenInhalt::Unlesbar => "(Nachricht nicht entschluesselbar)",
                };
                println!("[{zeit}] {}: {text}", nachricht.sender_name);
            }
        }

        Befehl::Senden { group, text } => {
            let sitzung = client.sitzung(GroupId::from(group));
            sitzung.senden(&text).await?;
            tracing::info!("Nachricht gesendet");
        }
    }

    Ok(())
}
