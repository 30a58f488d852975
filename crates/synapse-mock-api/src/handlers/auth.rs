//! 인증 API 핸들러.
//!
//! 리프레시 토큰은 본문이 아니라 HttpOnly 쿠키로만 주고받는다.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use synapse_core::models::session::UserIdentity;
use tracing::{debug, info};

use super::{bearer_token, cookie_value};
use crate::error::MockApiError;
use crate::MockApiState;

/// 리프레시 쿠키 이름
pub const REFRESH_COOKIE: &str = "refresh_token";

/// 리프레시 쿠키 경로 — 인증 엔드포인트에만 전송된다
const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";

/// 로그인 요청 DTO
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 로그인/리프레시 응답 DTO
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserIdentity>,
}

fn refresh_cookie(token: &str) -> String {
    format!("{REFRESH_COOKIE}={token}; HttpOnly; Path={REFRESH_COOKIE_PATH}; SameSite=Lax")
}

fn expired_refresh_cookie() -> String {
    format!("{REFRESH_COOKIE}=; HttpOnly; Path={REFRESH_COOKIE_PATH}; Max-Age=0")
}

/// 이메일/비밀번호 로그인
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<MockApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MockApiError> {
    let Json(req) = payload.map_err(|e| MockApiError::Validation(e.body_text()))?;

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(MockApiError::Validation(
            "email과 password는 필수입니다".to_string(),
        ));
    }

    let user = state
        .authenticate(req.email.trim(), &req.password)
        .ok_or(MockApiError::InvalidCredentials)?;

    let access_token = state.issue_access_token(&user.id);
    let refresh_token = state.issue_refresh_token(&user.id);
    info!("로그인: user_id={}", user.id);

    Ok((
        [(SET_COOKIE, refresh_cookie(&refresh_token))],
        Json(TokenResponse {
            access_token,
            user: Some(user),
        }),
    ))
}

/// 리프레시 쿠키로 새 액세스 토큰 발급
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<MockApiState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, MockApiError> {
    state.record_refresh_call();

    let delay = state.refresh_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let user = cookie_value(&headers, REFRESH_COOKIE)
        .and_then(|token| state.user_for_refresh_token(token))
        .ok_or(MockApiError::RefreshTokenInvalid)?;

    let access_token = state.issue_access_token(&user.id);
    debug!("토큰 갱신: user_id={}", user.id);

    let user = if state.omit_user_on_refresh() {
        None
    } else {
        Some(user)
    };
    Ok(Json(TokenResponse { access_token, user }))
}

/// 로그아웃 — 리프레시 토큰 폐기, 쿠키 만료
///
/// POST /api/v1/auth/logout
pub async fn logout(State(state): State<MockApiState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = cookie_value(&headers, REFRESH_COOKIE) {
        state.revoke_refresh_token(token);
    }
    if let Some(token) = bearer_token(&headers) {
        state.revoke_access_token(token);
    }
    info!("로그아웃");

    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, expired_refresh_cookie())],
    )
}
