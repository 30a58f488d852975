//! mock API 서버를 띄워 로그인 → 401 → 리프레시 → 재전송 흐름을 검증한다.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use synapse_core::config::ApiConfig;
use synapse_core::models::api_error::codes;
use synapse_core::models::event::AuthEvent;
use synapse_mock_api::{MockApiState, SpawnedServer};
use synapse_network::HttpApiClient;
use synapse_session::storage::MemoryStorage;
use synapse_session::{EventBus, SessionStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("synapse_network=debug")
        .with_test_writer()
        .try_init();
}

async fn setup(state: MockApiState) -> (SpawnedServer, HttpApiClient) {
    init_tracing();
    let server = synapse_mock_api::spawn(state).await.unwrap();
    let store = Arc::new(SessionStore::hydrate(Arc::new(MemoryStorage::new())));
    let config = ApiConfig {
        base_url: server.base_url(),
        request_timeout_ms: 5_000,
    };
    let client = HttpApiClient::new(&config, store, EventBus::new("synapse")).unwrap();
    (server, client)
}

#[tokio::test]
async fn expired_access_token_is_refreshed_transparently() {
    let (server, client) = setup(MockApiState::new()).await;

    client.login("admin@synapse.dev", "admin123").await.unwrap();
    let first_token = client.store().access_token().unwrap();

    server.state.revoke_access_tokens();
    let menus = client.menus().await.unwrap();

    assert!(!menus.is_empty());
    assert_eq!(server.state.refresh_calls(), 1);
    assert_ne!(client.store().access_token().unwrap(), first_token);
    assert_eq!(client.store().user().unwrap().email, "admin@synapse.dev");
}

#[tokio::test]
async fn concurrent_401s_trigger_exactly_one_refresh() {
    let state = MockApiState::new().with_refresh_delay(Duration::from_millis(200));
    let (server, client) = setup(state).await;

    client.login("user@synapse.dev", "user123").await.unwrap();
    server.state.revoke_access_tokens();

    let refreshed = Arc::new(Mutex::new(0));
    let r = refreshed.clone();
    let _sub = client
        .events()
        .subscribe_auth(AuthEvent::TokenRefreshed, move |_| *r.lock() += 1);

    let mut handles = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        handles.push(tokio::spawn(async move { client.menus().await }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(server.state.refresh_calls(), 1);
    assert_eq!(client.coordinator().attempts_started(), 1);
    assert_eq!(*refreshed.lock(), 1);
}

#[tokio::test]
async fn refresh_without_user_keeps_previous_identity() {
    let (server, client) = setup(MockApiState::new()).await;
    server.state.set_omit_user_on_refresh(true);

    let user = client.login("admin@synapse.dev", "admin123").await.unwrap();
    server.state.revoke_access_tokens();

    client.menus().await.unwrap();
    assert_eq!(client.store().user(), Some(user));
    assert!(client.store().is_authenticated());
}

#[tokio::test]
async fn revoked_refresh_cookie_logs_out() {
    let (server, client) = setup(MockApiState::new()).await;
    client.login("admin@synapse.dev", "admin123").await.unwrap();

    let logged_out = Arc::new(Mutex::new(Vec::new()));
    let l = logged_out.clone();
    let _sub = client
        .events()
        .subscribe_auth(AuthEvent::UserLoggedOut, move |e| {
            l.lock().push(e.detail["reason"].clone());
        });

    server.state.revoke_access_tokens();
    server.state.revoke_refresh_tokens();

    let err = client.menus().await.unwrap_err();
    assert_eq!(err.code, codes::AUTH_REFRESH_FAILED);
    assert_eq!(err.status_code, 401);
    assert!(!client.store().is_authenticated());
    assert_eq!(*logged_out.lock(), vec![serde_json::json!(codes::AUTH_REFRESH_FAILED)]);
}

#[tokio::test]
async fn logout_then_refresh_fails() {
    let (_server, client) = setup(MockApiState::new()).await;
    client.login("admin@synapse.dev", "admin123").await.unwrap();

    client.logout().await.unwrap();
    assert!(!client.store().is_authenticated());

    let err = client.refresh_session().await.unwrap_err();
    assert_eq!(err.code, codes::AUTH_REFRESH_FAILED);
}
