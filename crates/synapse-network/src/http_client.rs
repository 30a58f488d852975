//! HTTP REST API 클라이언트.
//!
//! 세션 스토어의 액세스 토큰을 Bearer 헤더로 자동 주입하고,
//! 401 응답을 가로채 공유 리프레시 후 원 요청을 한 번 재전송한다.
//! 전송 계층 재시도는 하지 않는다.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use synapse_core::config::ApiConfig;
use synapse_core::error::CoreError;
use synapse_core::models::api_error::ApiError;
use synapse_core::models::menu::MenuItem;
use synapse_core::models::session::UserIdentity;
use synapse_session::{EventBus, SessionStore};
use tracing::debug;

use crate::auth::{MENUS_PATH, REFRESH_PATH};
use crate::error_mapping::{from_decode, from_response, from_transport};
use crate::refresh::{RefreshCoordinator, RefreshGrant};

/// 단일 API 요청 기술
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// base URL 뒤에 붙는 경로 (쿼리 포함 가능)
    pub path: String,
    pub body: Option<Value>,
    /// 401 후 이미 한 번 재전송되었는지
    pub retried: bool,
    /// 401이어도 리프레시 흐름을 타지 않음 (로그인/로그아웃)
    pub skip_refresh: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retried: false,
            skip_refresh: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// JSON 본문 설정
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn skip_refresh(mut self) -> Self {
        self.skip_refresh = true;
        self
    }

    /// 리프레시 엔드포인트 대상인지 (쿼리 제외 경로 비교)
    fn targets_refresh_endpoint(&self) -> bool {
        self.path.split('?').next() == Some(REFRESH_PATH)
    }
}

/// REST API 클라이언트
///
/// 복제해도 같은 쿠키 저장소, 세션 스토어, 리프레시 코디네이터를 공유한다.
#[derive(Clone)]
pub struct HttpApiClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) store: Arc<SessionStore>,
    pub(crate) events: EventBus,
    coordinator: RefreshCoordinator,
}

impl HttpApiClient {
    /// 새 HTTP API 클라이언트 생성
    pub fn new(
        config: &ApiConfig,
        store: Arc<SessionStore>,
        events: EventBus,
    ) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .cookie_store(true)
            .build()
            .map_err(|e| CoreError::Config(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            coordinator: RefreshCoordinator::new(store.clone(), events.clone()),
            store,
            events,
        })
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 요청 실행 후 성공 본문을 `T`로 디코딩
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let resp = self.send_intercepted(request).await?;
        resp.json::<T>().await.map_err(from_decode)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        self.execute(ApiRequest::post(path).json(body)).await
    }

    /// 내비게이션 메뉴 조회
    pub async fn menus(&self) -> Result<Vec<MenuItem>, ApiError> {
        self.get(MENUS_PATH).await
    }

    /// 명시적 세션 리프레시 — 진행 중인 시도가 있으면 합류
    pub async fn refresh_session(&self) -> Result<UserIdentity, ApiError> {
        let client = self.client.clone();
        let url = self.url(REFRESH_PATH);
        self.coordinator
            .refresh_with(move || call_refresh_endpoint(client, url))
            .await
    }

    /// 401 인터셉트가 적용된 전송
    pub(crate) async fn send_intercepted(
        &self,
        mut request: ApiRequest,
    ) -> Result<reqwest::Response, ApiError> {
        loop {
            let sent_token = self.store.access_token();
            let resp = self.send_once(&request, sent_token.as_deref()).await?;
            let status = resp.status();

            if status.is_success() {
                return Ok(resp);
            }

            if status != StatusCode::UNAUTHORIZED
                || request.targets_refresh_endpoint()
                || request.retried
                || request.skip_refresh
            {
                return Err(from_response(resp).await);
            }

            debug!(
                "401 수신, 토큰 갱신 후 재전송: {} {}",
                request.method, request.path
            );
            request.retried = true;

            // 보낸 뒤 다른 호출자의 갱신이 이미 끝났으면 새 토큰으로 바로 재전송
            let current = self.store.access_token();
            if current.is_some() && current != sent_token {
                debug!("이미 갱신된 토큰으로 재전송");
                continue;
            }
            self.refresh_session().await?;
        }
    }

    /// 주어진 토큰으로 한 번 전송
    async fn send_once(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path));

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(from_transport)
    }
}

/// 리프레시 엔드포인트 호출 (쿠키 저장소의 리프레시 쿠키 사용, 빈 본문)
async fn call_refresh_endpoint(
    client: reqwest::Client,
    url: String,
) -> Result<RefreshGrant, ApiError> {
    let resp = client.post(&url).send().await.map_err(from_transport)?;
    if !resp.status().is_success() {
        return Err(from_response(resp).await);
    }
    resp.json::<RefreshGrant>().await.map_err(from_decode)
}
