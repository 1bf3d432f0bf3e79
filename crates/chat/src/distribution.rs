//! Verteilung eines neuen Gruppenschluessels an die Mitglieder

use tracing::{info, warn};
use zirkel_core::{GroupId, UserId, WrappedGroupKey};
use zirkel_crypto::{generate_group_key, wrap_group_key, AsymmetricCipher};
use zirkel_db::KeyValueStore;

use crate::api::Backend;
use crate::error::{ChatError, ChatResult};
use crate::key_service::KeyService;
use crate::types::Verteilung;

impl<B: Backend, S: KeyValueStore, A: AsymmetricCipher + 'static> KeyService<B, S, A> {
    /// Erzeugt einen Gruppenschluessel und wickelt ihn fuer jedes Mitglied ein
    ///
    /// Mitglieder, deren oeffentlicher Schluessel nicht abrufbar ist, landen
    /// in `fehlgeschlagen`. Ein ungueltiger Schluessel eines Mitglieds wird
    /// ebenso behandelt. Doppelte IDs werden nur einmal bedient.
    pub async fn gruppenschluessel_verteilen(
        &self,
        group_id: &GroupId,
        mitglieder: &[UserId],
    ) -> ChatResult<Verteilung> {
        if mitglieder.is_empty() {
            return Err(ChatError::UngueltigeEingabe(
                "Gruppe ohne Mitglieder".into(),
            ));
        }

        let group_key = generate_group_key(self.zufall.as_ref())?;
        let mut verpackt = Vec::with_capacity(mitglieder.len());
        let mut fehlgeschlagen = Vec::new();

        for (i, mitglied) in mitglieder.iter().enumerate() {
            if mitglieder[..i].contains(mitglied) {
                continue;
            }

            let ergebnis = match self.fetch_public_key(mitglied).await {
                Ok(pem) => wrap_group_key(self.cipher.as_ref(), &group_key, &pem)
                    .map_err(ChatError::from),
                Err(e) => Err(e),
            };

            match ergebnis {
                Ok(encrypted_group_key) => verpackt.push(WrappedGroupKey {
                    group_id: group_id.clone(),
                    recipient_user_id: mitglied.clone(),
                    encrypted_group_key,
                }),
                Err(e) => {
                    warn!(group_id = %group_id, user_id = %mitglied, fehler = %e, "Mitglied nicht erreichbar");
                    fehlgeschlagen.push((mitglied.clone(), e.to_string()));
                }
            }
        }

        info!(
            group_id = %group_id,
            verpackt = verpackt.len(),
            fehlgeschlagen = fehlgeschlagen.len(),
            "Gruppenschluessel verteilt"
        );

        Ok(Verteilung {
            group_id: group_id.clone(),
            group_key,
            verpackt,
            fehlgeschlagen,
        })
    }
}
