//! Backend-Trait: alles, was der Client vom Server braucht
//!
//! Die Orchestrierung haengt nur von diesem Trait ab, die HTTP-Umsetzung
//! liegt in `http.rs`.

use zirkel_core::{EncryptedMessage, GroupDetails, GroupId, NewMessage, UserId, WrappedGroupKey};

use crate::error::ChatResult;

/// Authentifizierter Zugriff auf das Gruppen-Backend
///
/// Fehlt eine Ressource, meldet die Implementierung `ChatError::NichtGefunden`;
/// Netzwerk- und Serverfehler werden zu `ChatError::AbrufFehlgeschlagen`.
#[allow(async_fn_in_trait)]
pub trait Backend: Send + Sync {
    /// Oeffentlicher Schluessel (SPKI-PEM) eines Benutzers
    async fn public_key(&self, user_id: &UserId) -> ChatResult<String>;

    /// Der fuer den angemeldeten Benutzer eingewickelte Gruppenschluessel
    async fn wrapped_group_key(&self, group_id: &GroupId) -> ChatResult<WrappedGroupKey>;

    async fn group_details(&self, group_id: &GroupId) -> ChatResult<GroupDetails>;

    async fn username(&self, user_id: &UserId) -> ChatResult<String>;

    /// Alle (verschluesselten) Nachrichten einer Gruppe
    async fn messages(&self, group_id: &GroupId) -> ChatResult<Vec<EncryptedMessage>>;

    async fn send_message(&self, message: &NewMessage) -> ChatResult<()>;
}
