//! 로그인/로그아웃.
//!
//! 인증 엔드포인트 자체의 401은 리프레시 흐름을 타지 않는다.
//! 리프레시 토큰은 서버가 HttpOnly 쿠키로 내려주며 클라이언트 쿠키 저장소에만 보관된다.

use serde::{Deserialize, Serialize};
use serde_json::json;
use synapse_core::models::api_error::ApiError;
use synapse_core::models::event::AuthEvent;
use synapse_core::models::session::UserIdentity;
use tracing::{info, warn};

use crate::error_mapping::from_decode;
use crate::http_client::{ApiRequest, HttpApiClient};

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";
pub const LOGOUT_PATH: &str = "/api/v1/auth/logout";
pub const MENUS_PATH: &str = "/api/v1/menus";

/// 명시적 로그아웃 시 `user_logged_out` 이벤트의 `reason` 값.
/// 리프레시 실패로 인한 로그아웃은 에러 코드가 들어간다.
pub const EXPLICIT_LOGOUT_REASON: &str = "logout";

/// 로그인 요청 본문
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 로그인 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserIdentity,
}

impl HttpApiClient {
    /// 이메일/비밀번호 로그인 → 세션 설정 후 `user_logged_in` 알림
    pub async fn login(&self, email: &str, password: &str) -> Result<UserIdentity, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = ApiRequest::post(LOGIN_PATH)
            .json(json!(body))
            .skip_refresh();

        let resp = self.send_intercepted(request).await?;
        let auth: AuthResponse = resp.json().await.map_err(from_decode)?;

        self.store.set_auth(auth.access_token, auth.user.clone());
        self.events.dispatch_auth(
            AuthEvent::UserLoggedIn,
            json!({ "userId": auth.user.id, "role": auth.user.role }),
        );
        info!("로그인 성공: user_id={}", auth.user.id);
        Ok(auth.user)
    }

    /// 로그아웃 — 서버 호출이 실패해도 로컬 세션은 제거한다
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .send_intercepted(ApiRequest::post(LOGOUT_PATH).skip_refresh())
            .await
            .map(|_| ());

        if let Err(e) = &result {
            warn!("서버 로그아웃 실패, 로컬 세션만 제거: {e}");
        }

        self.store.clear_auth();
        self.events.dispatch_auth(
            AuthEvent::UserLoggedOut,
            json!({ "reason": EXPLICIT_LOGOUT_REASON }),
        );
        info!("로그아웃");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use synapse_core::config::ApiConfig;
    use synapse_core::models::api_error::codes;
    use synapse_core::models::session::UserRole;
    use synapse_session::storage::MemoryStorage;
    use synapse_session::{EventBus, SessionStore};

    fn client_for(url: &str) -> HttpApiClient {
        let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
        let config = ApiConfig {
            base_url: url.to_string(),
            request_timeout_ms: 5_000,
        };
        HttpApiClient::new(&config, store, EventBus::new("synapse")).unwrap()
    }

    fn admin() -> UserIdentity {
        UserIdentity {
            id: "u_admin".to_string(),
            email: "admin@synapse.dev".to_string(),
            name: "Admin".to_string(),
            role: UserRole::Admin,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn login_sets_session_and_notifies() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", LOGIN_PATH)
            .with_status(200)
            .with_body(json!({ "access_token": "tok", "user": admin() }).to_string())
            .create_async()
            .await;

        let client = client_for(&server.url());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let _sub = client.events().subscribe("synapse:auth:user_logged_in", move |e| {
            s.lock().push(e.detail.clone());
        });

        let user = client.login("admin@synapse.dev", "admin123").await.unwrap();
        assert_eq!(user, admin());
        assert_eq!(client.store().access_token().as_deref(), Some("tok"));
        assert_eq!(seen.lock()[0]["role"], "admin");
    }

    #[tokio::test]
    async fn wrong_credentials_do_not_trigger_refresh() {
        let mut server = mockito::Server::new_async().await;
        let _login = server
            .mock("POST", LOGIN_PATH)
            .with_status(401)
            .with_body(
                json!({ "code": codes::AUTH_INVALID_CREDENTIALS, "message": "잘못된 자격 증명" })
                    .to_string(),
            )
            .create_async()
            .await;
        let refresh = server
            .mock("POST", REFRESH_PATH)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.login("admin@synapse.dev", "nope").await.unwrap_err();
        assert_eq!(err.code, codes::AUTH_INVALID_CREDENTIALS);
        assert!(!client.store().is_authenticated());
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_server_fails() {
        let mut server = mockito::Server::new_async().await;
        let _logout = server
            .mock("POST", LOGOUT_PATH)
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server.url());
        client.store().set_auth("tok".to_string(), admin());
        let logged_out = Arc::new(Mutex::new(0));
        let l = logged_out.clone();
        let _sub = client
            .events()
            .subscribe_auth(AuthEvent::UserLoggedOut, move |_| *l.lock() += 1);

        let err = client.logout().await.unwrap_err();
        assert_eq!(err.status_code, 500);
        assert!(!client.store().is_authenticated());
        assert_eq!(*logged_out.lock(), 1);
    }
}
