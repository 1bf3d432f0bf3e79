//! Tests fuer den HTTP-Client gegen ein axum-Fake-Backend

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use zirkel_core::{GroupId, NewMessage, UserId};

use crate::api::Backend;
use crate::error::ChatError;
use crate::http::{HttpBackend, STANDARD_TIMEOUT};
use crate::types::SitzungsKontext;

const TOKEN: &str = "token-1";

#[derive(Default)]
struct Zustand {
    empfangen: Mutex<Vec<Value>>,
}

fn nicht_autorisiert(headers: &HeaderMap) -> Option<Response> {
    let erwartet = format!("Bearer {TOKEN}");
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(wert) if wert == erwartet => None,
        _ => Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Token ungueltig" })),
            )
                .into_response(),
        ),
    }
}

async fn public_key(headers: HeaderMap, Path(user_id): Path<String>) -> Response {
    if let Some(antwort) = nicht_autorisiert(&headers) {
        return antwort;
    }
    match user_id.as_str() {
        "u-1" => Json(json!({ "publicKey": "-----BEGIN PUBLIC KEY-----\nAA==\n-----END PUBLIC KEY-----" }))
            .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "User not found" }))).into_response(),
    }
}

async fn group_key(headers: HeaderMap, Path(group_id): Path<String>) -> Response {
    if let Some(antwort) = nicht_autorisiert(&headers) {
        return antwort;
    }
    match group_id.as_str() {
        "g-1" => Json(json!({ "encryptedGroupKey": "d3JhcHBlZA==" })).into_response(),
        "g-leer" => Json(json!({})).into_response(),
        "g-fremd" => (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Not a member of this group" })),
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Group not found" }))).into_response(),
    }
}

async fn details(headers: HeaderMap, Path(group_id): Path<String>) -> Response {
    if let Some(antwort) = nicht_autorisiert(&headers) {
        return antwort;
    }
    Json(json!({
        "name": format!("Gruppe {group_id}"),
        "members": [{ "_id": "u-1", "username": "alice" }, { "username": "bob" }],
        "admin": "u-1"
    }))
    .into_response()
}

async fn username(headers: HeaderMap, Path(user_id): Path<String>) -> Response {
    if let Some(antwort) = nicht_autorisiert(&headers) {
        return antwort;
    }
    match user_id.as_str() {
        "u-1" => Json(json!({ "username": "alice" })).into_response(),
        "langsam" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "username": "zu spaet" })).into_response()
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Datenbank weg" })),
        )
            .into_response(),
    }
}

async fn messages(headers: HeaderMap, Path(group_id): Path<String>) -> Response {
    if let Some(antwort) = nicht_autorisiert(&headers) {
        return antwort;
    }
    match group_id.as_str() {
        "g-kaputt" => "kein json".into_response(),
        _ => Json(json!({
            "messages": [
                { "sender": "u-1", "content": "AAAA", "timestamp": "2024-05-01T12:00:00Z" },
                { "sender": "u-2", "content": "BBBB" }
            ]
        }))
        .into_response(),
    }
}

async fn send_message(
    State(zustand): State<Arc<Zustand>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(antwort) = nicht_autorisiert(&headers) {
        return antwort;
    }
    zustand.empfangen.lock().push(body);
    (StatusCode::CREATED, Json(json!({ "message": "ok" }))).into_response()
}

/// Startet das Fake-Backend auf einem freien Port und liefert die Basis-URL
async fn fake_server(zustand: Arc<Zustand>) -> String {
    let app = Router::new()
        .route("/api/groups/users/publicKey/:user_id", get(public_key))
        .route("/api/groups/groupKey/:group_id", get(group_key))
        .route("/api/groups/details/:group_id", get(details))
        .route("/api/groups/getUsername/:user_id", get(username))
        .route("/api/groups/messages/:group_id", get(messages))
        .route("/api/groups/sendMessage", post(send_message))
        .with_state(zustand);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

async fn client(token: &str) -> (HttpBackend, Arc<Zustand>) {
    let zustand = Arc::new(Zustand::default());
    let url = fake_server(Arc::clone(&zustand)).await;
    let backend = HttpBackend::new(&url, STANDARD_TIMEOUT, SitzungsKontext::new("u-1", token))
        .expect("Client konnte nicht erstellt werden");
    (backend, zustand)
}

#[tokio::test]
async fn test_oeffentlicher_schluessel() {
    let (backend, _) = client(TOKEN).await;

    let pem = backend.public_key(&UserId::from("u-1")).await.unwrap();
    assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));

    let result = backend.public_key(&UserId::from("u-9")).await;
    assert!(matches!(result, Err(ChatError::NichtGefunden(_))));
}

#[tokio::test]
async fn test_falsches_token() {
    let (backend, _) = client("falsch").await;

    let err = backend.public_key(&UserId::from("u-1")).await.unwrap_err();
    assert!(matches!(err, ChatError::AbrufFehlgeschlagen(ref msg) if msg.contains("Token ungueltig")));
}

#[tokio::test]
async fn test_gruppenschluessel_abrufen() {
    let (backend, _) = client(TOKEN).await;

    let wrapped = backend.wrapped_group_key(&GroupId::from("g-1")).await.unwrap();
    assert_eq!(wrapped.encrypted_group_key, "d3JhcHBlZA==");
    assert_eq!(wrapped.group_id, GroupId::from("g-1"));
    assert_eq!(wrapped.recipient_user_id, UserId::from("u-1"));

    for fehlend in ["g-leer", "g-unbekannt", "g-fremd"] {
        let result = backend.wrapped_group_key(&GroupId::from(fehlend)).await;
        assert!(matches!(result, Err(ChatError::NichtGefunden(_))), "{fehlend}");
    }
}

#[tokio::test]
async fn test_kein_mitglied_ist_nicht_wiederholbar() {
    let (backend, _) = client(TOKEN).await;

    let err = backend
        .wrapped_group_key(&GroupId::from("g-fremd"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NichtGefunden(ref msg) if msg.contains("Not a member")));
    assert!(!err.ist_wiederholbar());
}

#[tokio::test]
async fn test_details_und_benutzername() {
    let (backend, _) = client(TOKEN).await;

    let details = backend.group_details(&GroupId::from("g-1")).await.unwrap();
    assert_eq!(details.name, "Gruppe g-1");
    assert_eq!(details.members.len(), 2);
    assert_eq!(details.members[0].id, Some(UserId::from("u-1")));
    assert_eq!(details.admin, Some(UserId::from("u-1")));

    assert_eq!(backend.username(&UserId::from("u-1")).await.unwrap(), "alice");
    let err = backend.username(&UserId::from("u-2")).await.unwrap_err();
    assert!(err.ist_wiederholbar());
}

#[tokio::test]
async fn test_nachrichten_abrufen() {
    let (backend, _) = client(TOKEN).await;

    let nachrichten = backend.messages(&GroupId::from("g-1")).await.unwrap();
    assert_eq!(nachrichten.len(), 2);
    assert_eq!(nachrichten[0].sender_id, UserId::from("u-1"));
    assert!(nachrichten[0].timestamp.is_some());
    assert!(nachrichten[1].timestamp.is_none());

    let result = backend.messages(&GroupId::from("g-kaputt")).await;
    assert!(matches!(result, Err(ChatError::AbrufFehlgeschlagen(_))));
}

#[tokio::test]
async fn test_nachricht_senden() {
    let (backend, zustand) = client(TOKEN).await;

    backend
        .send_message(&NewMessage {
            content: "Y2hpZmZyYXQ=".into(),
            sender_id: UserId::from("u-1"),
            group_id: GroupId::from("g-1"),
        })
        .await
        .unwrap();

    let empfangen = zustand.empfangen.lock().clone();
    assert_eq!(
        empfangen,
        vec![json!({ "content": "Y2hpZmZyYXQ=", "senderId": "u-1", "groupId": "g-1" })]
    );
}

#[tokio::test]
async fn test_backend_nicht_erreichbar() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(
        &format!("http://{addr}"),
        STANDARD_TIMEOUT,
        SitzungsKontext::new("u-1", TOKEN),
    )
    .unwrap();

    let err = backend.public_key(&UserId::from("u-1")).await.unwrap_err();
    assert!(matches!(err, ChatError::AbrufFehlgeschlagen(_)));
    assert!(err.ist_wiederholbar());
}

#[tokio::test]
async fn test_timeout() {
    let zustand = Arc::new(Zustand::default());
    let url = fake_server(zustand).await;
    let backend = HttpBackend::new(
        &url,
        Duration::from_millis(200),
        SitzungsKontext::new("u-1", TOKEN),
    )
    .unwrap();

    let result = backend.username(&UserId::from("langsam")).await;
    assert!(matches!(result, Err(ChatError::AbrufFehlgeschlagen(_))));
}
