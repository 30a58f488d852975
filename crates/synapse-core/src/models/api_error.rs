//! 정규화된 API 에러.
//!
//! 모든 네트워크 실패는 `{ code, message, statusCode, details }` 형태로 통일된다.
//! 공유 리프레시 future의 출력으로 쓰이므로 `Clone`이어야 한다.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// 에러 코드 상수
pub mod codes {
    /// 서버 본문에 코드가 없거나 전송 계층 실패
    pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
    /// 리프레시 엔드포인트 호출 자체가 실패
    pub const AUTH_REFRESH_FAILED: &str = "AUTH_REFRESH_FAILED";
    /// 리프레시는 성공했으나 사용 가능한 사용자 신원이 없음
    pub const AUTH_USER_CONTEXT_MISSING: &str = "AUTH_USER_CONTEXT_MISSING";
    /// 잘못된 이메일/비밀번호
    pub const AUTH_INVALID_CREDENTIALS: &str = "AUTH_INVALID_CREDENTIALS";
    /// 리프레시 쿠키가 없거나 만료됨
    pub const AUTH_REFRESH_TOKEN_INVALID: &str = "AUTH_REFRESH_TOKEN_INVALID";
    /// 액세스 토큰이 없거나 만료됨
    pub const AUTH_TOKEN_INVALID: &str = "AUTH_TOKEN_INVALID";
    /// 요청 본문 검증 실패
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
}

/// 전송 계층이 상태 코드를 주지 않을 때 사용하는 기본값
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// 정규화된 API 에러 (와이어 계약)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{code} ({status_code}): {message}")]
pub struct ApiError {
    /// 에러 코드 (예: "AUTH_REFRESH_FAILED")
    pub code: String,
    /// 사람이 읽을 수 있는 메시지
    pub message: String,
    /// HTTP 상태 코드
    pub status_code: u16,
    /// 부가 정보
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// 서버 에러 본문 — 모든 필드가 선택
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<Value>,
}

impl ApiError {
    /// 새 에러 생성
    pub fn new(code: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status_code,
            details: None,
        }
    }

    /// 부가 정보 설정
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// 전송 계층 실패 (연결 불가, 타임아웃 등)
    ///
    /// 전송 계층이 상태 코드를 알려주지 않으면 500으로 간주한다.
    pub fn transport(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::new(
            codes::UNKNOWN_ERROR,
            message,
            status_code.unwrap_or(DEFAULT_ERROR_STATUS),
        )
    }

    /// 에러 응답 본문에서 정규화
    ///
    /// 본문이 에러 형태의 JSON이면 `code`/`message`를 가져오고,
    /// 아니면 `UNKNOWN_ERROR`와 원문(비어 있으면 `fallback_message`)을 사용한다.
    pub fn from_response_body(status_code: u16, body: &str, fallback_message: &str) -> Self {
        let raw_message = if body.trim().is_empty() {
            fallback_message.to_string()
        } else {
            body.to_string()
        };

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Self {
                code: parsed
                    .code
                    .unwrap_or_else(|| codes::UNKNOWN_ERROR.to_string()),
                message: parsed.message.unwrap_or(raw_message),
                status_code,
                details: parsed.details,
            },
            Err(_) => Self::new(codes::UNKNOWN_ERROR, raw_message, status_code),
        }
    }

    /// 리프레시 엔드포인트 실패 — 원인 에러를 `details`에 보존
    pub fn refresh_failed(cause: &ApiError) -> Self {
        let details = serde_json::to_value(cause).unwrap_or(Value::Null);
        Self::new(
            codes::AUTH_REFRESH_FAILED,
            cause.message.clone(),
            cause.status_code,
        )
        .with_details(details)
    }

    /// 리프레시 응답에 사용자 신원이 없음
    pub fn user_context_missing() -> Self {
        Self::new(
            codes::AUTH_USER_CONTEXT_MISSING,
            "리프레시 응답에 사용자 정보가 없고 기존 사용자도 없음",
            401,
        )
    }

    /// 401 여부
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_body_code_and_message_are_used() {
        let body = r#"{"code":"AUTH_TOKEN_INVALID","message":"토큰 만료","statusCode":401,"details":{"hint":"refresh"}}"#;
        let err = ApiError::from_response_body(401, body, "Unauthorized");
        assert_eq!(err.code, codes::AUTH_TOKEN_INVALID);
        assert_eq!(err.message, "토큰 만료");
        assert_eq!(err.status_code, 401);
        assert_eq!(err.details.unwrap()["hint"], "refresh");
    }

    #[test]
    fn plain_text_body_falls_back_to_unknown() {
        let err = ApiError::from_response_body(502, "Bad Gateway from proxy", "Bad Gateway");
        assert_eq!(err.code, codes::UNKNOWN_ERROR);
        assert_eq!(err.message, "Bad Gateway from proxy");
        assert_eq!(err.status_code, 502);
    }

    #[test]
    fn empty_body_uses_fallback_message() {
        let err = ApiError::from_response_body(404, "", "Not Found");
        assert_eq!(err.code, codes::UNKNOWN_ERROR);
        assert_eq!(err.message, "Not Found");
    }

    #[test]
    fn transport_error_defaults_to_500() {
        let err = ApiError::transport("connection refused", None);
        assert_eq!(err.status_code, 500);
        assert_eq!(err.code, codes::UNKNOWN_ERROR);
    }

    #[test]
    fn refresh_failed_keeps_cause_in_details() {
        let cause = ApiError::new(codes::AUTH_REFRESH_TOKEN_INVALID, "쿠키 없음", 401);
        let err = ApiError::refresh_failed(&cause);
        assert_eq!(err.code, codes::AUTH_REFRESH_FAILED);
        assert_eq!(err.status_code, 401);
        assert_eq!(
            err.details.unwrap()["code"],
            codes::AUTH_REFRESH_TOKEN_INVALID
        );
    }

    #[test]
    fn wire_shape_uses_status_code_key() {
        let json = serde_json::to_value(ApiError::new("X", "y", 418)).unwrap();
        assert_eq!(json["statusCode"], 418);
        assert!(json.get("details").is_none());
    }
}
