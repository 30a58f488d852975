//! 세션 스토어.
//!
//! 현재 액세스 토큰과 사용자 신원을 보관한다. 변경은 `set_auth`/`clear_auth`로만
//! 일어나며, 변경마다 탭 범위 저장소의 `auth-storage` 키에 동기 기록된다.
//! 개별 변경은 락 아래에서 원자적이지만, `.await`를 사이에 둔
//! 읽기-후-쓰기 시퀀스는 원자적이지 않다.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use synapse_core::models::session::{Session, UserIdentity};
use synapse_core::ports::storage::KeyValueStorage;
use tracing::{debug, warn};

/// 세션 영속 저장 키 (탭 범위)
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// 영속 포맷 버전 — 다르면 세션 없음으로 취급
const PERSIST_VERSION: u32 = 0;

/// 영속 대상 상태 (`is_hydrating`은 저장하지 않음)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    access_token: Option<String>,
    user: Option<UserIdentity>,
    is_authenticated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedEnvelope {
    state: PersistedState,
    version: u32,
}

/// 세션 스토어
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    /// 복원 없이 로그아웃 상태로 생성
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            state: RwLock::new(Session::logged_out()),
            storage,
        }
    }

    /// 저장소에서 세션을 복원하며 생성
    ///
    /// 복원 동안 `is_hydrating = true`. 손상되었거나 없는 데이터는
    /// 세션 없음(로그아웃)으로 처리한다.
    pub fn hydrate(storage: Arc<dyn KeyValueStorage>) -> Self {
        let store = Self::new(storage);
        store.set_hydrating(true);

        match store.load_persisted() {
            Some((token, user)) => {
                debug!("세션 복원: user_id={}", user.id);
                store.set_auth(token, user);
            }
            None => {
                debug!("복원할 세션 없음");
                store.set_hydrating(false);
            }
        }

        store
    }

    /// 토큰과 사용자를 원자적으로 교체
    pub fn set_auth(&self, access_token: String, user: UserIdentity) {
        let snapshot = {
            let mut state = self.state.write();
            *state = Session::authenticated(access_token, user);
            state.clone()
        };
        self.persist(&snapshot);
    }

    /// 토큰과 사용자 제거
    pub fn clear_auth(&self) {
        let snapshot = {
            let mut state = self.state.write();
            state.access_token = None;
            state.user = None;
            state.is_authenticated = false;
            state.clone()
        };
        self.persist(&snapshot);
    }

    /// 복원 진행 여부 설정
    pub fn set_hydrating(&self, hydrating: bool) {
        self.state.write().is_hydrating = hydrating;
    }

    /// 현재 세션 복제본
    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.read().access_token.clone()
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    pub fn is_hydrating(&self) -> bool {
        self.state.read().is_hydrating
    }

    /// 영속 데이터 로드 — 유효한 인증 상태일 때만 `Some`
    fn load_persisted(&self) -> Option<(String, UserIdentity)> {
        let raw = match self.storage.get(AUTH_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("세션 저장소 읽기 실패, 로그아웃 상태로 시작: {e}");
                return None;
            }
        };

        let envelope: PersistedEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("세션 데이터 손상, 로그아웃 상태로 시작: {e}");
                return None;
            }
        };

        if envelope.version != PERSIST_VERSION {
            warn!(
                "세션 데이터 버전 불일치 (expected={PERSIST_VERSION}, actual={})",
                envelope.version
            );
            return None;
        }

        match envelope.state {
            PersistedState {
                access_token: Some(token),
                user: Some(user),
                is_authenticated: true,
            } => Some((token, user)),
            _ => None,
        }
    }

    /// 변경 내용을 동기 기록. 실패해도 메모리 상태는 유지한다.
    fn persist(&self, session: &Session) {
        let envelope = PersistedEnvelope {
            state: PersistedState {
                access_token: session.access_token.clone(),
                user: session.user.clone(),
                is_authenticated: session.is_authenticated,
            },
            version: PERSIST_VERSION,
        };

        let result = serde_json::to_string(&envelope)
            .map_err(synapse_core::error::CoreError::from)
            .and_then(|raw| self.storage.set(AUTH_STORAGE_KEY, &raw));

        if let Err(e) = result {
            warn!("세션 저장 실패: {e}");
        }
    }
}
