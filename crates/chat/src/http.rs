//! HTTP-Umsetzung des `Backend`-Traits (reqwest, Bearer-Token)

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use zirkel_core::{EncryptedMessage, GroupDetails, GroupId, NewMessage, UserId, WrappedGroupKey};

use crate::api::Backend;
use crate::error::{ChatError, ChatResult};
use crate::types::SitzungsKontext;

/// Standard-Timeout fuer Backend-Anfragen
pub const STANDARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Status, die als `NichtGefunden` gelten
const FEHLT: &[StatusCode] = &[StatusCode::NOT_FOUND];

/// Beim Gruppenschluessel heisst 403 "kein Mitglied", also ebenfalls kein Schluessel
const FEHLT_ODER_KEIN_MITGLIED: &[StatusCode] = &[StatusCode::NOT_FOUND, StatusCode::FORBIDDEN];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyAntwort {
    #[serde(default)]
    public_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupKeyAntwort {
    #[serde(default)]
    encrypted_group_key: Option<String>,
}

#[derive(Deserialize)]
struct UsernameAntwort {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Deserialize)]
struct NachrichtenAntwort {
    #[serde(default)]
    messages: Vec<EncryptedMessage>,
}

/// Backend-Client ueber HTTP
pub struct HttpBackend {
    http: Client,
    base_url: Url,
    kontext: SitzungsKontext,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url.as_str())
            .field("kontext", &self.kontext)
            .finish()
    }
}

impl HttpBackend {
    /// Erstellt einen Client fuer `base_url` (z.B. `https://chat.example.org/api`)
    pub fn new(base_url: &str, timeout: Duration, kontext: SitzungsKontext) -> ChatResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ChatError::Konfiguration(format!("Ungueltige Backend-URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ChatError::Konfiguration(format!(
                "Backend-URL '{base_url}' kann keine Pfade aufnehmen"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Konfiguration(format!("HTTP-Client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            kontext,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn kontext(&self) -> &SitzungsKontext {
        &self.kontext
    }

    /// Haengt Pfadsegmente an die Basis-URL an (IDs werden kodiert)
    fn url(&self, segmente: &[&str]) -> ChatResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ChatError::Konfiguration("Backend-URL ohne Pfad".into()))?
            .pop_if_empty()
            .extend(segmente);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segmente: &[&str],
        ressource: &str,
        fehlt: &[StatusCode],
    ) -> ChatResult<T> {
        let url = self.url(segmente)?;
        debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .bearer_auth(self.kontext.token.as_str())
            .send()
            .await
            .map_err(|e| abruf_fehler(ressource, e))?;

        let body = antwort_pruefen(response, ressource, fehlt).await?;
        serde_json::from_str(&body).map_err(|e| {
            ChatError::AbrufFehlgeschlagen(format!("{ressource}: ungueltige Antwort: {e}"))
        })
    }
}

fn abruf_fehler(ressource: &str, err: reqwest::Error) -> ChatError {
    warn!(ressource, fehler = %err, "Backend nicht erreichbar");
    ChatError::AbrufFehlgeschlagen(format!("{ressource}: {err}"))
}

/// Prueft den Status und liefert den Body
///
/// Status aus `fehlt` werden zu `NichtGefunden`, jeder andere Fehlerstatus
/// zu `AbrufFehlgeschlagen`.
async fn antwort_pruefen(
    response: Response,
    ressource: &str,
    fehlt: &[StatusCode],
) -> ChatResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| abruf_fehler(ressource, e))?;

    if fehlt.contains(&status) {
        return Err(ChatError::NichtGefunden(format!(
            "{ressource}: {}",
            fehlermeldung(&body)
        )));
    }
    if !status.is_success() {
        warn!(ressource, %status, "Backend meldet Fehler");
        return Err(ChatError::AbrufFehlgeschlagen(format!(
            "{ressource}: HTTP {status}: {}",
            fehlermeldung(&body)
        )));
    }
    Ok(body)
}

/// Liest das `message`-Feld einer Fehlerantwort
fn fehlermeldung(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| "unbekannter Fehler".to_string())
}

fn nicht_leer(wert: Option<String>, was: &str) -> ChatResult<String> {
    match wert {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ChatError::NichtGefunden(format!("{was} fehlt in der Antwort"))),
    }
}

impl Backend for HttpBackend {
    async fn public_key(&self, user_id: &UserId) -> ChatResult<String> {
        let antwort: PublicKeyAntwort = self
            .get_json(
                &["groups", "users", "publicKey", user_id.as_str()],
                "Oeffentlicher Schluessel",
                FEHLT,
            )
            .await?;
        nicht_leer(antwort.public_key, "publicKey")
    }

    async fn wrapped_group_key(&self, group_id: &GroupId) -> ChatResult<WrappedGroupKey> {
        let antwort: GroupKeyAntwort = self
            .get_json(
                &["groups", "groupKey", group_id.as_str()],
                "Gruppenschluessel",
                FEHLT_ODER_KEIN_MITGLIED,
            )
            .await?;
        Ok(WrappedGroupKey {
            group_id: group_id.clone(),
            recipient_user_id: self.kontext.user_id.clone(),
            encrypted_group_key: nicht_leer(antwort.encrypted_group_key, "encryptedGroupKey")?,
        })
    }

    async fn group_details(&self, group_id: &GroupId) -> ChatResult<GroupDetails> {
        self.get_json(&["groups", "details", group_id.as_str()], "Gruppendetails", FEHLT)
            .await
    }

    async fn username(&self, user_id: &UserId) -> ChatResult<String> {
        let antwort: UsernameAntwort = self
            .get_json(&["groups", "getUsername", user_id.as_str()], "Benutzername", FEHLT)
            .await?;
        nicht_leer(antwort.username, "username")
    }

    async fn messages(&self, group_id: &GroupId) -> ChatResult<Vec<EncryptedMessage>> {
        let antwort: NachrichtenAntwort = self
            .get_json(&["groups", "messages", group_id.as_str()], "Nachrichten", FEHLT)
            .await?;
        Ok(antwort.messages)
    }

    async fn send_message(&self, message: &NewMessage) -> ChatResult<()> {
        let url = self.url(&["groups", "sendMessage"])?;
        debug!(%url, group_id = %message.group_id, "POST");

        let response = self
            .http
            .post(url)
            .bearer_auth(self.kontext.token.as_str())
            .json(message)
            .send()
            .await
            .map_err(|e| abruf_fehler("Nachricht senden", e))?;

        antwort_pruefen(response, "Nachricht senden", FEHLT).await?;
        Ok(())
    }
}
