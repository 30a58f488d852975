//! mock API 에러 처리.
//!
//! 모든 에러는 클라이언트와 같은 `{ code, message, statusCode }` 형태로 응답한다.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use synapse_core::models::api_error::{codes, ApiError};
use thiserror::Error;

/// mock API 에러
#[derive(Debug, Error)]
pub enum MockApiError {
    /// 잘못된 이메일/비밀번호
    #[error("이메일 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,

    /// 리프레시 쿠키가 없거나 폐기됨
    #[error("리프레시 토큰이 없거나 만료되었습니다")]
    RefreshTokenInvalid,

    /// Bearer 토큰이 없거나 폐기됨
    #[error("액세스 토큰이 없거나 만료되었습니다")]
    TokenInvalid,

    /// 요청 본문 검증 실패
    #[error("요청 검증 실패: {0}")]
    Validation(String),
}

impl MockApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            MockApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, codes::AUTH_INVALID_CREDENTIALS)
            }
            MockApiError::RefreshTokenInvalid => {
                (StatusCode::UNAUTHORIZED, codes::AUTH_REFRESH_TOKEN_INVALID)
            }
            MockApiError::TokenInvalid => (StatusCode::UNAUTHORIZED, codes::AUTH_TOKEN_INVALID),
            MockApiError::Validation(_) => (StatusCode::BAD_REQUEST, codes::VALIDATION_ERROR),
        }
    }
}

impl IntoResponse for MockApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ApiError::new(code, self.to_string(), status.as_u16());
        (status, Json(body)).into_response()
    }
}
