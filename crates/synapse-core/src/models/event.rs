//! 크로스 앱 이벤트 모델.
//!
//! 모듈 그래프를 공유하지 않는 애플리케이션 간의 네임스페이스 이벤트.
//! 이름 형식: `<namespace>:<domain>:<action>`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 기본 이벤트 네임스페이스
pub const DEFAULT_EVENT_NAMESPACE: &str = "synapse";

/// 크로스 앱 이벤트 — fire-and-forget, 전달 보장 없음
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossAppEvent {
    /// 네임스페이스가 붙은 이벤트 이름
    pub name: String,
    /// 페이로드 (버전 없음)
    pub detail: Value,
}

impl CrossAppEvent {
    pub fn new(name: impl Into<String>, detail: Value) -> Self {
        Self {
            name: name.into(),
            detail,
        }
    }
}

/// 세션 라이프사이클 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// 로그인 성공
    UserLoggedIn,
    /// 로그아웃 (명시적 또는 리프레시 실패)
    UserLoggedOut,
    /// 토큰 갱신 성공
    TokenRefreshed,
}

impl AuthEvent {
    fn action(self) -> &'static str {
        match self {
            Self::UserLoggedIn => "user_logged_in",
            Self::UserLoggedOut => "user_logged_out",
            Self::TokenRefreshed => "token_refreshed",
        }
    }

    /// 네임스페이스가 붙은 이벤트 이름
    pub fn event_name(self, namespace: &str) -> String {
        format!("{namespace}:auth:{}", self.action())
    }
}

/// 비즈니스 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessEvent {
    /// 주문 생성
    OrderCreated,
}

impl BusinessEvent {
    /// 네임스페이스가 붙은 이벤트 이름
    pub fn event_name(self, namespace: &str) -> String {
        match self {
            Self::OrderCreated => format!("{namespace}:business:order_created"),
        }
    }
}
