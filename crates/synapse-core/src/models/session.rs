//! 세션 모델.
//!
//! 현재 액세스 토큰과 사용자 신원을 표현한다.

use serde::{Deserialize, Serialize};

/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

/// 인증 백엔드가 발급한 사용자 신원.
///
/// 세션 동안 불변이며, 갱신 시 필드 단위가 아니라 통째로 교체된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// 사용자 ID
    pub id: String,
    /// 이메일
    pub email: String,
    /// 표시 이름
    pub name: String,
    /// 역할
    pub role: UserRole,
    /// 아바타 URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// 현재 세션 상태
///
/// 불변식: `is_authenticated == (access_token.is_some() && user.is_some())`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// 액세스 토큰
    pub access_token: Option<String>,
    /// 로그인한 사용자
    pub user: Option<UserIdentity>,
    /// 인증 여부
    pub is_authenticated: bool,
    /// 영속 상태 복원 중 여부.
    /// true인 동안 `is_authenticated == false`를 "로그아웃"으로 해석하면 안 된다.
    pub is_hydrating: bool,
}

impl Session {
    /// 로그아웃 상태 (초기 형태)
    pub fn logged_out() -> Self {
        Self {
            access_token: None,
            user: None,
            is_authenticated: false,
            is_hydrating: false,
        }
    }

    /// 인증된 세션
    pub fn authenticated(access_token: String, user: UserIdentity) -> Self {
        Self {
            access_token: Some(access_token),
            user: Some(user),
            is_authenticated: true,
            is_hydrating: false,
        }
    }

    /// 인증 불변식 충족 여부
    pub fn is_consistent(&self) -> bool {
        self.is_authenticated == (self.access_token.is_some() && self.user.is_some())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::logged_out()
    }
}
