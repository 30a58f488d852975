//! mock 서버 상태 — 시드 사용자, 발급된 토큰, 테스트 훅.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use synapse_core::models::menu::MenuItem;
use synapse_core::models::session::{UserIdentity, UserRole};
use uuid::Uuid;

/// 시드 사용자 (비밀번호는 서버 내부에만 존재)
#[derive(Debug, Clone)]
struct SeedUser {
    identity: UserIdentity,
    password: String,
}

struct StateInner {
    users: Vec<SeedUser>,
    /// 액세스 토큰 → 사용자 ID
    access_tokens: RwLock<HashMap<String, String>>,
    /// 리프레시 토큰 → 사용자 ID
    refresh_tokens: RwLock<HashMap<String, String>>,
    refresh_calls: AtomicUsize,
    refresh_delay_ms: AtomicU64,
    omit_user_on_refresh: AtomicBool,
}

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct MockApiState {
    inner: Arc<StateInner>,
}

impl Default for MockApiState {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApiState {
    /// 기본 시드 사용자로 생성
    pub fn new() -> Self {
        let users = vec![
            SeedUser {
                identity: UserIdentity {
                    id: "u_admin".to_string(),
                    email: "admin@synapse.dev".to_string(),
                    name: "Admin".to_string(),
                    role: UserRole::Admin,
                    avatar: None,
                },
                password: "admin123".to_string(),
            },
            SeedUser {
                identity: UserIdentity {
                    id: "u_user".to_string(),
                    email: "user@synapse.dev".to_string(),
                    name: "User".to_string(),
                    role: UserRole::User,
                    avatar: None,
                },
                password: "user123".to_string(),
            },
        ];

        Self {
            inner: Arc::new(StateInner {
                users,
                access_tokens: RwLock::new(HashMap::new()),
                refresh_tokens: RwLock::new(HashMap::new()),
                refresh_calls: AtomicUsize::new(0),
                refresh_delay_ms: AtomicU64::new(0),
                omit_user_on_refresh: AtomicBool::new(false),
            }),
        }
    }

    /// 리프레시 응답 지연 설정
    pub fn with_refresh_delay(self, delay: Duration) -> Self {
        self.set_refresh_delay(delay);
        self
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.inner.refresh_delay_ms.store(ms, Ordering::Relaxed);
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.inner.refresh_delay_ms.load(Ordering::Relaxed))
    }

    /// 리프레시 응답에서 `user` 필드를 생략할지
    pub fn set_omit_user_on_refresh(&self, omit: bool) {
        self.inner
            .omit_user_on_refresh
            .store(omit, Ordering::Relaxed);
    }

    pub fn omit_user_on_refresh(&self) -> bool {
        self.inner.omit_user_on_refresh.load(Ordering::Relaxed)
    }

    /// 지금까지 받은 리프레시 요청 수
    pub fn refresh_calls(&self) -> usize {
        self.inner.refresh_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn record_refresh_call(&self) {
        self.inner.refresh_calls.fetch_add(1, Ordering::SeqCst);
    }

    /// 발급된 모든 액세스 토큰 폐기 (다음 요청이 401을 받도록)
    pub fn revoke_access_tokens(&self) {
        self.inner.access_tokens.write().clear();
    }

    /// 발급된 모든 리프레시 토큰 폐기
    pub fn revoke_refresh_tokens(&self) {
        self.inner.refresh_tokens.write().clear();
    }

    /// 자격 증명 확인
    pub(crate) fn authenticate(&self, email: &str, password: &str) -> Option<UserIdentity> {
        self.inner
            .users
            .iter()
            .find(|u| u.identity.email.eq_ignore_ascii_case(email) && u.password == password)
            .map(|u| u.identity.clone())
    }

    fn user_by_id(&self, user_id: &str) -> Option<UserIdentity> {
        self.inner
            .users
            .iter()
            .find(|u| u.identity.id == user_id)
            .map(|u| u.identity.clone())
    }

    pub(crate) fn issue_access_token(&self, user_id: &str) -> String {
        let token = format!("at_{}", Uuid::new_v4().simple());
        self.inner
            .access_tokens
            .write()
            .insert(token.clone(), user_id.to_string());
        token
    }

    pub(crate) fn issue_refresh_token(&self, user_id: &str) -> String {
        let token = format!("rt_{}", Uuid::new_v4().simple());
        self.inner
            .refresh_tokens
            .write()
            .insert(token.clone(), user_id.to_string());
        token
    }

    pub(crate) fn user_for_access_token(&self, token: &str) -> Option<UserIdentity> {
        let user_id = self.inner.access_tokens.read().get(token).cloned()?;
        self.user_by_id(&user_id)
    }

    pub(crate) fn user_for_refresh_token(&self, token: &str) -> Option<UserIdentity> {
        let user_id = self.inner.refresh_tokens.read().get(token).cloned()?;
        self.user_by_id(&user_id)
    }

    pub(crate) fn revoke_refresh_token(&self, token: &str) {
        self.inner.refresh_tokens.write().remove(token);
    }

    pub(crate) fn revoke_access_token(&self, token: &str) {
        self.inner.access_tokens.write().remove(token);
    }

    /// 사용자 역할별 내비게이션 메뉴
    pub(crate) fn menus_for(&self, user: &UserIdentity) -> Vec<MenuItem> {
        let mut menus = vec![
            MenuItem {
                id: "dashboard".to_string(),
                label: "Dashboard".to_string(),
                path: "/dashboard".to_string(),
                icon: Some("layout-dashboard".to_string()),
                remote: Some("dashboardMfe".to_string()),
                children: Vec::new(),
            },
            MenuItem {
                id: "reports".to_string(),
                label: "Reports".to_string(),
                path: "/reports".to_string(),
                icon: Some("file-chart".to_string()),
                remote: Some("reportsMfe".to_string()),
                children: vec![MenuItem {
                    id: "reports-monthly".to_string(),
                    label: "Monthly".to_string(),
                    path: "/reports/monthly".to_string(),
                    icon: None,
                    remote: Some("reportsMfe".to_string()),
                    children: Vec::new(),
                }],
            },
        ];

        if user.role == UserRole::Admin {
            menus.push(MenuItem {
                id: "settings".to_string(),
                label: "Settings".to_string(),
                path: "/settings".to_string(),
                icon: Some("settings".to_string()),
                remote: None,
                children: Vec::new(),
            });
        }

        menus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_credentials() {
        let state = MockApiState::new();
        assert_eq!(
            state.authenticate("admin@synapse.dev", "admin123").unwrap().role,
            UserRole::Admin
        );
        assert!(state.authenticate("admin@synapse.dev", "user123").is_none());
        assert!(state.authenticate("ghost@synapse.dev", "admin123").is_none());
    }

    #[test]
    fn revoke_access_tokens_invalidates_all() {
        let state = MockApiState::new();
        let a = state.issue_access_token("u_admin");
        let b = state.issue_access_token("u_user");
        assert!(state.user_for_access_token(&a).is_some());

        state.revoke_access_tokens();
        assert!(state.user_for_access_token(&a).is_none());
        assert!(state.user_for_access_token(&b).is_none());
    }

    #[test]
    fn admin_sees_settings_menu() {
        let state = MockApiState::new();
        let admin = state.authenticate("admin@synapse.dev", "admin123").unwrap();
        let user = state.authenticate("user@synapse.dev", "user123").unwrap();
        assert_eq!(state.menus_for(&admin).len(), 3);
        assert_eq!(state.menus_for(&user).len(), 2);
    }
}
