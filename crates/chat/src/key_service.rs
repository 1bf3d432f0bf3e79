//! Asymmetrischer Schluesseldienst
//!
//! Erzeugt und verwaltet das RSA-Schluesselpaar des Geraets, holt
//! oeffentliche Schluessel anderer Benutzer und wickelt Gruppenschluessel
//! ein und aus.

use std::sync::Arc;

use tokio::sync::Mutex;

use tracing::{debug, info, instrument};
use zeroize::Zeroizing;
use zirkel_core::UserId;
use zirkel_crypto::{self as crypto, AsymmetricCipher, KeyPair, OsZufall, RsaOaep, SecureRandomSource};
use zirkel_db::{KeyValueStore, LocalKeyStore};

use crate::api::Backend;
use crate::error::{ChatError, ChatResult};
use crate::types::Provisionierung;

/// Schluesseldienst fuer einen Benutzer auf einem Geraet
pub struct KeyService<B: Backend, S: KeyValueStore, A: AsymmetricCipher = RsaOaep> {
    pub(crate) backend: Arc<B>,
    pub(crate) keys: LocalKeyStore<S>,
    pub(crate) cipher: Arc<A>,
    pub(crate) zufall: Arc<dyn SecureRandomSource>,
    /// Serialisiert `schluesselpaar_sicherstellen` innerhalb dieses Dienstes
    bereitstellung: Mutex<()>,
}

impl<B: Backend, S: KeyValueStore> KeyService<B, S, RsaOaep> {
    /// Erstellt den Dienst mit RSA-OAEP-Standardeinstellungen
    pub fn neu(backend: Arc<B>, keys: LocalKeyStore<S>) -> Self {
        Self::mit_cipher(backend, keys, Arc::new(RsaOaep::default()), Arc::new(OsZufall))
    }
}

impl<B: Backend, S: KeyValueStore, A: AsymmetricCipher + 'static> KeyService<B, S, A> {
    pub fn mit_cipher(
        backend: Arc<B>,
        keys: LocalKeyStore<S>,
        cipher: Arc<A>,
        zufall: Arc<dyn SecureRandomSource>,
    ) -> Self {
        Self {
            backend,
            keys,
            cipher,
            zufall,
            bereitstellung: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn cipher(&self) -> &Arc<A> {
        &self.cipher
    }

    pub fn key_store(&self) -> &LocalKeyStore<S> {
        &self.keys
    }

    /// Erzeugt ein neues Schluesselpaar
    ///
    /// Die RSA-Erzeugung blockiert einige Sekunden und laeuft deshalb
    /// auf dem Blocking-Pool.
    pub async fn generate_key_pair(&self) -> ChatResult<KeyPair> {
        let cipher = Arc::clone(&self.cipher);
        let paar = tokio::task::spawn_blocking(move || cipher.generate_key_pair())
            .await
            .map_err(|e| ChatError::Intern(format!("Schluesselerzeugung abgebrochen: {e}")))??;
        info!("Neues Schluesselpaar erzeugt");
        Ok(paar)
    }

    /// Stellt sicher, dass dieses Geraet einen privaten Schluessel hat
    ///
    /// Ist keiner gespeichert, wird ein Paar erzeugt und der private Teil
    /// abgelegt. Der oeffentliche Teil wird zur Registrierung zurueckgegeben.
    ///
    /// Gleichzeitige Aufrufe auf demselben Dienst erzeugen hoechstens ein
    /// Paar. Mehrere Dienste oder Prozesse auf demselben Speicher werden
    /// nicht abgestimmt, pro Geraet gehoert der Aufruf an den Start.
    pub async fn schluesselpaar_sicherstellen(&self) -> ChatResult<Provisionierung> {
        let _sperre = self.bereitstellung.lock().await;
        if self.keys.get_optional().await?.is_some() {
            debug!("Privater Schluessel bereits vorhanden");
            return Ok(Provisionierung::Vorhanden);
        }

        let paar = self.generate_key_pair().await?;
        self.keys.put(&paar.private_key).await?;
        Ok(Provisionierung::Neu {
            public_key: paar.public_key,
        })
    }

    /// Privater Schluessel dieses Geraets, falls vorhanden
    pub async fn private_key(&self) -> ChatResult<Option<Zeroizing<String>>> {
        Ok(self.keys.get_optional().await?)
    }

    /// Holt den oeffentlichen Schluessel eines Benutzers vom Backend
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn fetch_public_key(&self, user_id: &UserId) -> ChatResult<String> {
        self.backend.public_key(user_id).await
    }

    /// Wickelt beliebige Daten fuer einen Empfaenger ein (Base64)
    pub fn wrap(&self, plaintext: &[u8], recipient_public_key_pem: &str) -> ChatResult<String> {
        Ok(crypto::wrap(self.cipher.as_ref(), plaintext, recipient_public_key_pem)?)
    }

    /// Kehrt `wrap` um
    pub fn unwrap(&self, wrapped_b64: &str, private_key_pem: &str) -> ChatResult<Vec<u8>> {
        Ok(crypto::unwrap(self.cipher.as_ref(), wrapped_b64, private_key_pem)?)
    }
}
