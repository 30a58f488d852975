//! reqwest 에러/응답 → `ApiError` 정규화.

use synapse_core::models::api_error::ApiError;
use tracing::warn;

/// 전송 계층 실패 (연결 불가, 타임아웃 등)
pub fn from_transport(err: reqwest::Error) -> ApiError {
    let message = if err.is_timeout() {
        format!("요청 타임아웃: {err}")
    } else if err.is_connect() {
        format!("서버 연결 실패: {err}")
    } else {
        err.to_string()
    };
    ApiError::transport(message, err.status().map(|s| s.as_u16()))
}

/// 성공 응답 본문 디코딩 실패
pub fn from_decode(err: reqwest::Error) -> ApiError {
    ApiError::transport(format!("응답 파싱 실패: {err}"), None)
}

/// 실패 응답 → 정규화 에러
pub async fn from_response(resp: reqwest::Response) -> ApiError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_else(|e| {
        warn!("응답 본문 읽기 실패: {e}");
        String::new()
    });
    ApiError::from_response_body(
        status.as_u16(),
        &body,
        status.canonical_reason().unwrap_or("Request failed"),
    )
}
