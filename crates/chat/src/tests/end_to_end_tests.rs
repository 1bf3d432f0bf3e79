//! Ablauf ueber alle Schichten: Schluesselpaar, Gruppenschluessel, Nachricht

use std::sync::Arc;

use zirkel_core::{GroupId, UserId};
use zirkel_crypto::{
    wrap_group_key, AesGcm, GroupKey, MessageCipher, OsZufall, RsaOaep, SchluesselPolitik,
};

use super::fakes::FakeBackend;
use super::key_service;
use crate::resolver::GroupKeyResolver;
use crate::service::ChatSitzung;
use crate::types::{Provisionierung, SitzungsKontext};

const G: &str = "770A8A65DA156D24EE2A093277530142";

fn legacy_cipher() -> MessageCipher {
    MessageCipher::new(AesGcm, Arc::new(OsZufall), SchluesselPolitik::Aes128Erlaubt)
}

#[tokio::test]
async fn test_hallo_ueber_alle_schichten() {
    let backend = Arc::new(FakeBackend::fuer("u-a"));

    // A erzeugt und speichert ein Schluesselpaar, registriert den oeffentlichen Teil
    let keys_a = key_service(&backend);
    let Provisionierung::Neu { public_key } = keys_a.schluesselpaar_sicherstellen().await.unwrap()
    else {
        panic!("Neues Paar erwartet");
    };
    backend.benutzer("u-a", "alice", Some(&public_key));

    // g wird unter A's oeffentlichem Schluessel eingewickelt
    let g = GroupKey::from_hex(G).unwrap();
    let pem = keys_a.fetch_public_key(&UserId::from("u-a")).await.unwrap();
    let wrapped = wrap_group_key(&RsaOaep::default(), &g, &pem).unwrap();
    backend.wrapped.write().insert(GroupId::from("g-1"), wrapped);

    // A holt und wickelt aus
    let resolver = GroupKeyResolver::new(Arc::clone(&backend), Arc::new(RsaOaep::default()));
    let private_key = keys_a.private_key().await.unwrap();
    let aufgeloest = resolver
        .resolve_group_key(&GroupId::from("g-1"), private_key.as_ref().map(|k| k.as_str()))
        .await
        .unwrap();
    assert_eq!(aufgeloest.as_hex(), G);

    // A verschluesselt, eine andere Partei mit g entschluesselt
    let chiffrat = legacy_cipher().encrypt(b"hello", aufgeloest.as_hex()).unwrap();
    let klartext = legacy_cipher().decrypt_text(&chiffrat, G).unwrap();
    assert_eq!(klartext, "hello");
}

#[tokio::test]
async fn test_hallo_ueber_die_sitzung() {
    let backend = Arc::new(FakeBackend::fuer("u-a"));
    let keys_a = key_service(&backend);
    let Provisionierung::Neu { public_key } = keys_a.schluesselpaar_sicherstellen().await.unwrap()
    else {
        panic!("Neues Paar erwartet");
    };
    backend.benutzer("u-a", "alice", Some(&public_key));

    let g = GroupKey::from_hex(G).unwrap();
    let wrapped = wrap_group_key(&RsaOaep::default(), &g, &public_key).unwrap();
    backend.wrapped.write().insert(GroupId::from("g-1"), wrapped);

    let sitzung = ChatSitzung::neu(
        Arc::new(keys_a),
        legacy_cipher(),
        SitzungsKontext::new("u-a", "token-a"),
        GroupId::from("g-1"),
    );
    sitzung.senden("hello").await.unwrap();

    // Gegenstelle liest direkt vom Draht
    let gesendet = backend.gesendet.read()[0].content.clone();
    assert_eq!(legacy_cipher().decrypt_text(&gesendet, G).unwrap(), "hello");

    let verlauf = sitzung.verlauf().await.unwrap();
    assert_eq!(verlauf[0].inhalt.text(), Some("hello"));
    assert_eq!(verlauf[0].sender_name, "alice");
}
