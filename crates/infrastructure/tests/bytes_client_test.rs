//! Integration tests for the Bytes API client against a mock server.
//!
//! These tests drive [`BytesApiClient`] through full request flows: login on
//! 401, raw uploads with mime types, error mapping and the queue events
//! emitted after each accepted write.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use boefjes_application::{ArtifactKind, ArtifactStore, Clock, Notifier, StoreError};
use boefjes_domain::{
    Boefje, BoefjeMeta, Credentials, MimeTypes, Normalizer, NormalizerMeta, QueueEvent,
};
use boefjes_infrastructure::{
    BytesApiClient, InMemoryBytesClient, InMemoryEventSink, RemoteSettings,
};
use chrono::{DateTime, TimeZone, Utc};
use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;
use url::Url;

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }
}

fn notifier(sink: &InMemoryEventSink) -> Notifier {
    Notifier::new(Arc::new(sink.clone()), Arc::new(FixedClock))
}

fn remote_client(server: &ServerGuard, sink: &InMemoryEventSink) -> BytesApiClient {
    let settings = RemoteSettings::new(
        Url::parse(&server.url()).unwrap(),
        Credentials::new("boefjes", "secret"),
    );
    BytesApiClient::new(&settings, notifier(sink)).unwrap()
}

fn boefje_meta() -> BoefjeMeta {
    BoefjeMeta::new("task-1", Boefje::new("dns-records"), "acme")
        .with_input_ooi("Hostname|internet|example.com")
}

fn mime_types(values: &[&str]) -> MimeTypes {
    values.iter().map(ToString::to_string).collect()
}

async fn mock_token(server: &mut ServerGuard, token: &str, hits: usize) -> mockito::Mock {
    server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "boefjes".into()),
            Matcher::UrlEncoded("password".into(), "secret".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"access_token": "{token}", "token_type": "bearer"}}"#))
        .expect(hits)
        .create_async()
        .await
}

async fn mock_boefje_meta(server: &mut ServerGuard, meta: &BoefjeMeta) -> mockito::Mock {
    server
        .mock("GET", "/bytes/boefje_meta/task-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(meta).unwrap())
        .create_async()
        .await
}

#[tokio::test]
async fn test_save_raw_and_read_back() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();
    let meta = boefje_meta();

    let save_meta = server
        .mock("POST", "/bytes/boefje_meta")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJsonString(
            r#"{"id": "task-1", "organization": "acme"}"#.to_string(),
        ))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let save_raw = server
        .mock("POST", "/bytes/raw/task-1")
        .match_query(Matcher::UrlEncoded("mime_types".into(), "text/plain".into()))
        .match_header("content-type", "application/octet-stream")
        .match_body("hello")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    mock_boefje_meta(&mut server, &meta).await;
    server
        .mock("GET", "/bytes/raw/task-1")
        .with_status(200)
        .with_body("hello")
        .create_async()
        .await;
    let token = mock_token(&mut server, "t1", 0).await;

    let client = remote_client(&server, &sink);
    client.save_boefje_meta(&meta).await.unwrap();
    client
        .save_raw_with_mime_types("task-1", b"hello", &mime_types(&["text/plain"]))
        .await
        .unwrap();
    let raw = client.get_raw("task-1").await.unwrap();

    assert_eq!(raw, b"hello".to_vec());
    save_meta.assert_async().await;
    save_raw.assert_async().await;
    token.assert_async().await;

    let events = sink.events("acme__raw_file_received").await;
    assert_eq!(events.len(), 1);
    let QueueEvent::RawDataReceived(event) = &events[0] else {
        panic!("expected a raw data event, got {:?}", events[0]);
    };
    assert_eq!(event.organization, "acme");
    assert_eq!(event.raw_data.boefje_meta, meta);
    assert_eq!(event.raw_data.mime_type_set(), mime_types(&["text/plain"]));
    assert_eq!(sink.queue_names().await, vec!["acme__raw_file_received"]);
}

#[tokio::test]
async fn test_expired_token_triggers_one_login_and_one_retry() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();
    let meta = boefje_meta();

    let rejected = server
        .mock("GET", "/bytes/boefje_meta/task-1")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .with_body(r#"{"detail": "Not authenticated"}"#)
        .expect(1)
        .create_async()
        .await;
    let token = mock_token(&mut server, "t1", 1).await;
    let accepted = server
        .mock("GET", "/bytes/boefje_meta/task-1")
        .match_header("authorization", "bearer t1")
        .with_status(200)
        .with_body(serde_json::to_string(&meta).unwrap())
        .expect(1)
        .create_async()
        .await;

    let client = remote_client(&server, &sink);
    let fetched = client.get_boefje_meta("task-1").await.unwrap();

    assert_eq!(fetched, meta);
    rejected.assert_async().await;
    token.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test]
async fn test_token_is_reused_after_login() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();

    let token = mock_token(&mut server, "t1", 1).await;
    let with_token = server
        .mock("GET", "/bytes/raw/task-1")
        .match_header("authorization", "bearer t1")
        .with_status(200)
        .with_body("payload")
        .expect(2)
        .create_async()
        .await;

    let client = remote_client(&server, &sink);
    client.login().await.unwrap();
    client.get_raw("task-1").await.unwrap();
    client.get_raw("task-1").await.unwrap();

    token.assert_async().await;
    with_token.assert_async().await;
}

#[tokio::test]
async fn test_persistent_unauthorized_is_surfaced_after_one_retry() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();

    let rejected = server
        .mock("GET", "/bytes/raw/task-1")
        .with_status(401)
        .with_body(r#"{"detail": "Could not validate credentials"}"#)
        .expect(2)
        .create_async()
        .await;
    let token = mock_token(&mut server, "t1", 1).await;

    let client = remote_client(&server, &sink);
    let error = client.get_raw("task-1").await.unwrap_err();

    assert!(error.is_unauthorized(), "unexpected error: {error}");
    rejected.assert_async().await;
    token.assert_async().await;
}

#[tokio::test]
async fn test_rejected_login_is_an_auth_exchange_failure() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();

    server
        .mock("GET", "/bytes/boefje_meta/task-1")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/token")
        .with_status(401)
        .with_body(r#"{"detail": "Incorrect username or password"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = remote_client(&server, &sink);
    let error = client.get_boefje_meta("task-1").await.unwrap_err();

    assert!(matches!(error, StoreError::AuthExchange { .. }));
}

#[tokio::test]
async fn test_missing_artifacts_are_not_found() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();

    server
        .mock("GET", "/bytes/normalizer_meta/nope")
        .with_status(404)
        .with_body(r#"{"detail": "Not Found"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/bytes/raw/nope")
        .with_status(404)
        .create_async()
        .await;

    let client = remote_client(&server, &sink);

    let StoreError::NotFound { kind, id } = client.get_normalizer_meta("nope").await.unwrap_err()
    else {
        panic!("expected not found");
    };
    assert_eq!(kind, ArtifactKind::NormalizerMeta);
    assert_eq!(id, "nope");
    assert!(matches!(
        client.get_raw("nope").await,
        Err(StoreError::NotFound {
            kind: ArtifactKind::Raw,
            ..
        })
    ));
}

#[tokio::test]
async fn test_server_errors_are_transport_failures() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();

    server
        .mock("POST", "/bytes/boefje_meta")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let client = remote_client(&server, &sink);
    let error = client.save_boefje_meta(&boefje_meta()).await.unwrap_err();

    assert_eq!(error.status(), Some(500));
    assert!(error.to_string().contains("Internal Server Error"));
}

#[tokio::test]
async fn test_raw_for_unknown_owner_is_missing_owner() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();

    server
        .mock("POST", "/bytes/raw/ghost")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let client = remote_client(&server, &sink);
    let error = client.save_raw("ghost", b"data").await.unwrap_err();

    assert!(matches!(
        error,
        StoreError::MissingOwner { ref boefje_meta_id } if boefje_meta_id == "ghost"
    ));
    assert!(sink.queue_names().await.is_empty());
}

#[tokio::test]
async fn test_owner_lookup_failure_emits_nothing() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();

    server
        .mock("POST", "/bytes/raw/task-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/bytes/boefje_meta/task-1")
        .with_status(404)
        .create_async()
        .await;

    let client = remote_client(&server, &sink);
    let error = client.save_raw("task-1", b"data").await.unwrap_err();

    assert!(matches!(error, StoreError::MissingOwner { .. }));
    assert_eq!(sink.total_events().await, 0);
}

#[tokio::test]
async fn test_save_normalizer_meta_emits_event() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();

    let save = server
        .mock("POST", "/bytes/normalizer_meta")
        .match_body(Matcher::PartialJsonString(
            r#"{"id": "norm-1", "boefje_meta": {"id": "task-1"}}"#.to_string(),
        ))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let client = remote_client(&server, &sink);
    let normalizer_meta =
        NormalizerMeta::new("norm-1", Normalizer::new("kat_dns_normalize"), boefje_meta());
    client.save_normalizer_meta(&normalizer_meta).await.unwrap();

    save.assert_async().await;
    let events = sink.events("acme__normalizer_meta_received").await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].created_at(), FixedClock.now());
}

#[tokio::test]
async fn test_remote_and_memory_stores_emit_identical_events() {
    let mut server = Server::new_async().await;
    let meta = boefje_meta();
    let normalizer_meta = NormalizerMeta::new("norm-1", Normalizer::new("kat_dns_normalize"), meta.clone());

    server
        .mock("POST", "/bytes/boefje_meta")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("POST", "/bytes/raw/task-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("POST", "/bytes/normalizer_meta")
        .with_status(200)
        .create_async()
        .await;
    mock_boefje_meta(&mut server, &meta).await;

    let remote_sink = InMemoryEventSink::new();
    let memory_sink = InMemoryEventSink::new();
    let stores: Vec<Box<dyn ArtifactStore>> = vec![
        Box::new(remote_client(&server, &remote_sink)),
        Box::new(InMemoryBytesClient::new(notifier(&memory_sink))),
    ];

    for store in &stores {
        store.save_boefje_meta(&meta).await.unwrap();
        store
            .save_raw_with_mime_types("task-1", b"hello", &mime_types(&["text/plain", "boefje/dns-records"]))
            .await
            .unwrap();
        store.save_normalizer_meta(&normalizer_meta).await.unwrap();
    }

    assert_eq!(remote_sink.queue_names().await, memory_sink.queue_names().await);
    for queue in remote_sink.queue_names().await {
        assert_eq!(
            remote_sink.events(&queue).await,
            memory_sink.events(&queue).await,
            "events differ on {queue}"
        );
    }
    assert_eq!(remote_sink.total_events().await, 2);
}

#[tokio::test]
async fn test_rejected_raw_upload_is_resent_once_after_login() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();
    let meta = boefje_meta();

    let rejected = server
        .mock("POST", "/bytes/raw/task-1")
        .match_query(Matcher::UrlEncoded("mime_types".into(), "text/plain".into()))
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .with_body(r#"{"detail": "Not authenticated"}"#)
        .expect(1)
        .create_async()
        .await;
    let token = mock_token(&mut server, "t1", 1).await;
    let accepted = server
        .mock("POST", "/bytes/raw/task-1")
        .match_query(Matcher::UrlEncoded("mime_types".into(), "text/plain".into()))
        .match_header("authorization", "bearer t1")
        .match_header("content-type", "application/octet-stream")
        .match_body("hello")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    mock_boefje_meta(&mut server, &meta).await;

    let client = remote_client(&server, &sink);
    client
        .save_raw_with_mime_types("task-1", b"hello", &mime_types(&["text/plain"]))
        .await
        .unwrap();

    rejected.assert_async().await;
    token.assert_async().await;
    accepted.assert_async().await;
    assert_eq!(sink.events("acme__raw_file_received").await.len(), 1);
    assert_eq!(sink.total_events().await, 1);
}

#[tokio::test]
async fn test_failed_normalizer_meta_save_emits_nothing() {
    let mut server = Server::new_async().await;
    let sink = InMemoryEventSink::new();

    server
        .mock("POST", "/bytes/normalizer_meta")
        .with_status(500)
        .with_body("Internal Server Error")
        .expect(1)
        .create_async()
        .await;

    let client = remote_client(&server, &sink);
    let normalizer_meta =
        NormalizerMeta::new("norm-1", Normalizer::new("kat_dns_normalize"), boefje_meta());
    let error = client
        .save_normalizer_meta(&normalizer_meta)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        StoreError::Transport {
            status: Some(500),
            ..
        }
    ));
    assert!(!sink.contains_queue("acme__normalizer_meta_received").await);
    assert_eq!(sink.total_events().await, 0);
}
