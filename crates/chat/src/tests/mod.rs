//! Service-Tests fuer zirkel-chat

mod end_to_end_tests;
mod http_backend_tests;

use std::sync::{Arc, OnceLock};

use zirkel_crypto::{AsymmetricCipher, KeyPair, RsaOaep};
use zirkel_db::{InMemoryStore, LocalKeyStore};

use crate::key_service::KeyService;
use fakes::FakeBackend;

/// RSA-Erzeugung ist teuer, die Tests teilen sich zwei Paare
pub(crate) fn paar_a() -> &'static KeyPair {
    static PAAR: OnceLock<KeyPair> = OnceLock::new();
    PAAR.get_or_init(|| RsaOaep::default().generate_key_pair().expect("Schluesselpaar A"))
}

pub(crate) fn paar_b() -> &'static KeyPair {
    static PAAR: OnceLock<KeyPair> = OnceLock::new();
    PAAR.get_or_init(|| RsaOaep::default().generate_key_pair().expect("Schluesselpaar B"))
}

pub(crate) fn key_service(backend: &Arc<FakeBackend>) -> KeyService<FakeBackend, InMemoryStore> {
    KeyService::neu(Arc::clone(backend), LocalKeyStore::new(InMemoryStore::new()))
}
