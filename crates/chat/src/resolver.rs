//! Gruppenschluessel-Aufloesung
//!
//! Der einzige Ort, an dem die asymmetrische und die symmetrische Schicht
//! zusammentreffen: eingewickelten Schluessel holen, mit dem eigenen
//! privaten Schluessel auswickeln, Hex-Schluessel zurueckgeben.

use std::sync::Arc;

use tracing::{debug, warn};
use zirkel_core::GroupId;
use zirkel_crypto::{unwrap_group_key, AsymmetricCipher, GroupKey, RsaOaep};

use crate::api::Backend;
use crate::error::{ChatError, ChatResult};

pub struct GroupKeyResolver<B: Backend, A: AsymmetricCipher = RsaOaep> {
    backend: Arc<B>,
    cipher: Arc<A>,
}

impl<B: Backend, A: AsymmetricCipher> GroupKeyResolver<B, A> {
    pub fn new(backend: Arc<B>, cipher: Arc<A>) -> Self {
        Self { backend, cipher }
    }

    /// Loest den Gruppenschluessel fuer den angemeldeten Benutzer auf
    ///
    /// Ohne privaten Schluessel wird das Backend nicht kontaktiert. Ein
    /// fehlender eingewickelter Schluessel bleibt `NichtGefunden`, ein nicht
    /// auswickelbarer wird zu `GruppenschluesselNichtVerfuegbar`.
    pub async fn resolve_group_key(
        &self,
        group_id: &GroupId,
        private_key_pem: Option<&str>,
    ) -> ChatResult<GroupKey> {
        let Some(private_key_pem) = private_key_pem else {
            warn!(group_id = %group_id, "Kein privater Schluessel, Gruppenschluessel nicht aufloesbar");
            return Err(ChatError::KeinPrivaterSchluessel);
        };

        let wrapped = self.backend.wrapped_group_key(group_id).await?;

        match unwrap_group_key(
            self.cipher.as_ref(),
            &wrapped.encrypted_group_key,
            private_key_pem,
        ) {
            Ok(key) => {
                debug!(group_id = %group_id, bytes = key.len_bytes(), "Gruppenschluessel aufgeloest");
                Ok(key)
            }
            Err(e) => {
                warn!(group_id = %group_id, fehler = %e, "Gruppenschluessel nicht auswickelbar");
                Err(ChatError::GruppenschluesselNichtVerfuegbar {
                    group_id: group_id.to_string(),
                    grund: e.to_string(),
                })
            }
        }
    }
}
