//! Oeffentliche Typen fuer den Chat-Service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;
use zirkel_core::{GroupId, UserId, WrappedGroupKey};
use zirkel_crypto::GroupKey;

/// Name fuer Absender, deren Benutzername nicht ermittelt werden kann
pub const UNBEKANNTER_BENUTZER: &str = "Unknown User";

/// Verifizierte Sitzung, bereitgestellt von der Authentifizierung
///
/// Die Benutzer-ID wird nie aus dem Token gelesen.
#[derive(Clone)]
pub struct SitzungsKontext {
    pub user_id: UserId,
    pub token: Zeroizing<String>,
}

impl SitzungsKontext {
    pub fn new(user_id: impl Into<UserId>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: Zeroizing::new(token.into()),
        }
    }
}

impl std::fmt::Debug for SitzungsKontext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SitzungsKontext")
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Inhalt einer entschluesselten Nachricht
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum NachrichtenInhalt {
    Lesbar(String),
    /// Auth-Tag ungueltig, falscher Schluessel oder kaputter Payload
    Unlesbar,
}

impl NachrichtenInhalt {
    pub fn text(&self) -> Option<&str> {
        match self {
            NachrichtenInhalt::Lesbar(text) => Some(text),
            NachrichtenInhalt::Unlesbar => None,
        }
    }
}

/// Eine Chat-Nachricht nach der Entschluesselung
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatNachricht {
    pub sender_id: UserId,
    pub sender_name: String,
    pub inhalt: NachrichtenInhalt,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Ergebnis von `schluesselpaar_sicherstellen`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisionierung {
    /// Es lag bereits ein privater Schluessel im Speicher
    Vorhanden,
    /// Neues Paar erzeugt; der oeffentliche Schluessel muss beim Backend
    /// registriert werden
    Neu { public_key: String },
}

/// Ergebnis der Verteilung eines neuen Gruppenschluessels
#[derive(Debug)]
pub struct Verteilung {
    pub group_id: GroupId,
    pub group_key: GroupKey,
    /// Eingewickelte Schluessel, einer pro erreichbarem Mitglied
    pub verpackt: Vec<WrappedGroupKey>,
    /// Mitglieder ohne abrufbaren oeffentlichen Schluessel
    pub fehlgeschlagen: Vec<(UserId, String)>,
}

impl Verteilung {
    pub fn ist_vollstaendig(&self) -> bool {
        self.fehlgeschlagen.is_empty()
    }
}
