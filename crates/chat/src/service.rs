//! ChatSitzung – verschluesselter Gruppenchat fuer eine Gruppe
//!
//! Haelt den aufgeloesten Gruppenschluessel im Speicher und nutzt ihn fuer
//! Verlauf und Versand. Der Schluessel wird nie persistiert.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, instrument};
use zirkel_core::{GroupDetails, GroupId, NewMessage, UserId};
use zirkel_crypto::{
    AeadCipher, AesGcm, AsymmetricCipher, CryptoError, GroupKey, MessageCipher, RsaOaep,
};
use zirkel_db::KeyValueStore;

use crate::api::Backend;
use crate::error::{ChatError, ChatResult};
use crate::key_service::KeyService;
use crate::resolver::GroupKeyResolver;
use crate::types::{ChatNachricht, NachrichtenInhalt, SitzungsKontext, UNBEKANNTER_BENUTZER};

/// Sitzung eines angemeldeten Benutzers in einer Gruppe
pub struct ChatSitzung<B, S, A = RsaOaep, C = AesGcm>
where
    B: Backend,
    S: KeyValueStore,
    A: AsymmetricCipher,
    C: AeadCipher,
{
    keys: Arc<KeyService<B, S, A>>,
    resolver: GroupKeyResolver<B, A>,
    cipher: MessageCipher<C>,
    kontext: SitzungsKontext,
    group_id: GroupId,
    gruppenschluessel: RwLock<Option<GroupKey>>,
}

impl<B, S, A, C> ChatSitzung<B, S, A, C>
where
    B: Backend,
    S: KeyValueStore,
    A: AsymmetricCipher + 'static,
    C: AeadCipher,
{
    pub fn neu(
        keys: Arc<KeyService<B, S, A>>,
        cipher: MessageCipher<C>,
        kontext: SitzungsKontext,
        group_id: GroupId,
    ) -> Self {
        let resolver = GroupKeyResolver::new(Arc::clone(keys.backend()), Arc::clone(keys.cipher()));
        Self {
            keys,
            resolver,
            cipher,
            kontext,
            group_id,
            gruppenschluessel: RwLock::new(None),
        }
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn kontext(&self) -> &SitzungsKontext {
        &self.kontext
    }

    /// Gruppenschluessel aus dem Cache oder frisch aufgeloest
    pub async fn gruppenschluessel(&self) -> ChatResult<GroupKey> {
        let cached = self.gruppenschluessel.read().clone();
        if let Some(key) = cached {
            return Ok(key);
        }

        let private_key = self.keys.private_key().await?;
        let key = self
            .resolver
            .resolve_group_key(&self.group_id, private_key.as_ref().map(|k| k.as_str()))
            .await?;

        *self.gruppenschluessel.write() = Some(key.clone());
        Ok(key)
    }

    /// Vergisst den zwischengespeicherten Gruppenschluessel
    pub fn cache_leeren(&self) {
        *self.gruppenschluessel.write() = None;
    }

    pub async fn details(&self) -> ChatResult<GroupDetails> {
        self.keys.backend().group_details(&self.group_id).await
    }

    /// Laedt und entschluesselt den Nachrichtenverlauf
    ///
    /// Einzelne nicht entschluesselbare Nachrichten werden als `Unlesbar`
    /// geliefert. Passt der Gruppenschluessel selbst nicht zur
    /// Schluesselpolitik, schlaegt der ganze Verlauf fehl.
    #[instrument(skip(self), fields(group_id = %self.group_id))]
    pub async fn verlauf(&self) -> ChatResult<Vec<ChatNachricht>> {
        let key = self.gruppenschluessel().await?;
        let nachrichten = self.keys.backend().messages(&self.group_id).await?;

        let mut namen: HashMap<UserId, String> = HashMap::new();
        let mut verlauf = Vec::with_capacity(nachrichten.len());

        for msg in nachrichten {
            let inhalt = match self.cipher.decrypt_text(&msg.content, key.as_hex()) {
                Ok(text) => NachrichtenInhalt::Lesbar(text),
                Err(e @ CryptoError::UngueltigerSchluessel(_)) => return Err(e.into()),
                Err(e) => {
                    debug!(sender = %msg.sender_id, fehler = %e, "Nachricht nicht lesbar");
                    NachrichtenInhalt::Unlesbar
                }
            };

            let sender_name = match namen.get(&msg.sender_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self.benutzername(&msg.sender_id).await;
                    namen.insert(msg.sender_id.clone(), name.clone());
                    name
                }
            };

            verlauf.push(ChatNachricht {
                sender_id: msg.sender_id,
                sender_name,
                inhalt,
                timestamp: msg.timestamp,
            });
        }

        debug!(anzahl = verlauf.len(), "Verlauf geladen");
        Ok(verlauf)
    }

    /// Verschluesselt und sendet eine Nachricht
    ///
    /// Als Absender gilt immer der Benutzer aus dem Sitzungskontext.
    pub async fn senden(&self, text: &str) -> ChatResult<ChatNachricht> {
        if text.trim().is_empty() {
            return Err(ChatError::UngueltigeEingabe(
                "Nachrichteninhalt darf nicht leer sein".into(),
            ));
        }

        let key = self.gruppenschluessel().await?;
        let content = self.cipher.encrypt(text.as_bytes(), key.as_hex())?;

        self.keys
            .backend()
            .send_message(&NewMessage {
                content,
                sender_id: self.kontext.user_id.clone(),
                group_id: self.group_id.clone(),
            })
            .await?;

        info!(group_id = %self.group_id, "Nachricht gesendet");

        Ok(ChatNachricht {
            sender_id: self.kontext.user_id.clone(),
            sender_name: self.benutzername(&self.kontext.user_id).await,
            inhalt: NachrichtenInhalt::Lesbar(text.to_string()),
            timestamp: Some(Utc::now()),
        })
    }

    async fn benutzername(&self, user_id: &UserId) -> String {
        match self.keys.backend().username(user_id).await {
            Ok(name) => name,
            Err(e) => {
                debug!(user_id = %user_id, fehler = %e, "Benutzername nicht abrufbar");
                UNBEKANNTER_BENUTZER.to_string()
            }
        }
    }
}
