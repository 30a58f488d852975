//! 세션 리프레시 코디네이터.
//!
//! 동시에 도착한 401들이 각자 리프레시를 호출하지 않도록
//! 진행 중인 시도를 하나의 `Shared` future로 공유한다.
//!
//! 불변식:
//! - 코디네이터당 진행 중인 리프레시는 최대 1개
//! - 진행 중에 합류한 호출자는 모두 같은 결과를 받는다
//! - 핸들은 시도가 끝나는 시점(성공/실패)에 시도 내부에서 비워진다
//! - 시도는 별도 태스크에서 돌아가므로 호출자가 모두 사라져도 끝까지 정산된다

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use synapse_core::models::api_error::{codes, ApiError};
use synapse_core::models::event::AuthEvent;
use synapse_core::models::session::UserIdentity;
use synapse_session::{EventBus, SessionStore};
use tracing::{debug, info, warn};

/// 리프레시 엔드포인트 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshGrant {
    /// 새 액세스 토큰
    pub access_token: String,
    /// 새 사용자 신원 (생략 가능)
    #[serde(default)]
    pub user: Option<UserIdentity>,
}

/// 리프레시 결과 — 성공 시 세션에 반영된 사용자
pub type RefreshOutcome = Result<UserIdentity, ApiError>;

type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

struct Inner {
    in_flight: Mutex<Option<SharedRefresh>>,
    store: Arc<SessionStore>,
    events: EventBus,
    started: AtomicU64,
}

impl Inner {
    /// 리프레시 호출 결과를 세션 스토어에 반영
    fn settle(&self, result: Result<RefreshGrant, ApiError>) -> RefreshOutcome {
        match result {
            Ok(grant) => match grant.user.or_else(|| self.store.user()) {
                Some(user) => {
                    self.store.set_auth(grant.access_token, user.clone());
                    self.events
                        .dispatch_auth(AuthEvent::TokenRefreshed, json!({ "userId": user.id }));
                    info!("토큰 갱신 성공: user_id={}", user.id);
                    Ok(user)
                }
                None => {
                    let err = ApiError::user_context_missing();
                    warn!("토큰 갱신 응답에 사용자 정보 없음, 세션 제거");
                    self.expire_session(&err);
                    Err(err)
                }
            },
            Err(cause) => {
                warn!("토큰 갱신 실패, 세션 제거: {cause}");
                let err = ApiError::refresh_failed(&cause);
                self.expire_session(&err);
                Err(err)
            }
        }
    }

    fn expire_session(&self, reason: &ApiError) {
        self.store.clear_auth();
        self.events.dispatch_auth(
            AuthEvent::UserLoggedOut,
            json!({ "reason": reason.code, "message": reason.message }),
        );
    }
}

/// 리프레시 코디네이터 (복제 가능한 핸들)
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl RefreshCoordinator {
    pub fn new(store: Arc<SessionStore>, events: EventBus) -> Self {
        Self {
            inner: Arc::new(Inner {
                in_flight: Mutex::new(None),
                store,
                events,
                started: AtomicU64::new(0),
            }),
        }
    }

    /// 진행 중인 리프레시가 있는지
    pub fn is_refreshing(&self) -> bool {
        self.inner.in_flight.lock().is_some()
    }

    /// 지금까지 시작된 리프레시 시도 수
    pub fn attempts_started(&self) -> u64 {
        self.inner.started.load(Ordering::Relaxed)
    }

    /// 진행 중인 리프레시에 합류하거나, 없으면 `start`로 새로 시작
    ///
    /// `start`는 새 시도를 시작할 때만 호출된다. 시도는 `tokio::spawn`으로
    /// 실행되므로 tokio 런타임 안에서 호출해야 한다. 호출자가 future를 drop해도
    /// 시도는 계속 진행되어 세션에 반영되고 핸들이 비워진다.
    pub async fn refresh_with<F, Fut>(&self, start: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RefreshGrant, ApiError>> + Send + 'static,
    {
        let attempt = {
            let mut slot = self.inner.in_flight.lock();
            match slot.as_ref() {
                Some(existing) => {
                    debug!("진행 중인 토큰 갱신에 합류");
                    existing.clone()
                }
                None => {
                    let n = self.inner.started.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!("토큰 갱신 시작 (#{n})");

                    let inner = self.inner.clone();
                    let call = start();
                    let task = tokio::spawn(async move {
                        let outcome = inner.settle(call.await);
                        inner.in_flight.lock().take();
                        outcome
                    });

                    let inner = self.inner.clone();
                    let attempt = task
                        .map(move |joined| {
                            joined.unwrap_or_else(|e| {
                                // 태스크가 정산 전에 중단되면 핸들이 남으므로 여기서 비운다
                                inner.in_flight.lock().take();
                                warn!("토큰 갱신 태스크 중단: {e}");
                                Err(ApiError::new(
                                    codes::UNKNOWN_ERROR,
                                    format!("토큰 갱신 작업이 중단됨: {e}"),
                                    500,
                                ))
                            })
                        })
                        .boxed()
                        .shared();

                    *slot = Some(attempt.clone());
                    attempt
                }
            }
        };

        attempt.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use synapse_core::models::session::UserRole;
    use synapse_session::storage::MemoryStorage;
    use tokio::sync::Notify;

    fn user(id: &str) -> UserIdentity {
        UserIdentity {
            id: id.to_string(),
            email: format!("{id}@synapse.dev"),
            name: id.to_string(),
            role: UserRole::User,
            avatar: None,
        }
    }

    fn setup() -> (Arc<SessionStore>, EventBus, RefreshCoordinator) {
        let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
        let bus = EventBus::new("synapse");
        let coordinator = RefreshCoordinator::new(store.clone(), bus.clone());
        (store, bus, coordinator)
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let (store, _bus, coordinator) = setup();
        store.set_auth("old".to_string(), user("u_1"));

        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = coordinator.clone();
            let calls = calls.clone();
            let gate = gate.clone();
            handles.push(tokio::spawn(async move {
                coordinator
                    .refresh_with(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        gate.notified().await;
                        Ok(RefreshGrant {
                            access_token: "new".to_string(),
                            user: Some(user("u_1")),
                        })
                    })
                    .await
            }));
        }

        // 모든 호출자가 합류할 때까지 대기
        while !coordinator.is_refreshing() || calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        gate.notify_one();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().id, "u_1");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.attempts_started(), 1);
        assert_eq!(store.access_token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn handle_is_cleared_after_settlement() {
        let (store, _bus, coordinator) = setup();
        store.set_auth("old".to_string(), user("u_1"));

        for expected in 1..=2 {
            let outcome = coordinator
                .refresh_with(|| async {
                    Ok(RefreshGrant {
                        access_token: "next".to_string(),
                        user: None,
                    })
                })
                .await;
            assert!(outcome.is_ok());
            assert!(!coordinator.is_refreshing());
            assert_eq!(coordinator.attempts_started(), expected);
        }
    }

    #[tokio::test]
    async fn missing_user_falls_back_to_previous_identity() {
        let (store, _bus, coordinator) = setup();
        store.set_auth("old".to_string(), user("u_prev"));

        let outcome = coordinator
            .refresh_with(|| async {
                Ok(RefreshGrant {
                    access_token: "new".to_string(),
                    user: None,
                })
            })
            .await;

        assert_eq!(outcome.unwrap().id, "u_prev");
        assert_eq!(store.access_token().as_deref(), Some("new"));
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn missing_user_without_previous_identity_fails_and_clears() {
        let (store, bus, coordinator) = setup();
        let logged_out = Arc::new(AtomicUsize::new(0));
        let l = logged_out.clone();
        let _sub = bus.subscribe_auth(AuthEvent::UserLoggedOut, move |_| {
            l.fetch_add(1, Ordering::SeqCst);
        });

        let err = coordinator
            .refresh_with(|| async {
                Ok(RefreshGrant {
                    access_token: "new".to_string(),
                    user: None,
                })
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, codes::AUTH_USER_CONTEXT_MISSING);
        assert_eq!(store.snapshot(), synapse_core::models::session::Session::logged_out());
        assert_eq!(logged_out.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn endpoint_failure_clears_session() {
        let (store, _bus, coordinator) = setup();
        store.set_auth("old".to_string(), user("u_1"));

        let err = coordinator
            .refresh_with(|| async {
                Err(ApiError::new(
                    codes::AUTH_REFRESH_TOKEN_INVALID,
                    "쿠키 만료",
                    401,
                ))
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, codes::AUTH_REFRESH_FAILED);
        assert_eq!(err.status_code, 401);
        assert!(!store.is_authenticated());
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn success_dispatches_token_refreshed() {
        let (store, bus, coordinator) = setup();
        store.set_auth("old".to_string(), user("u_1"));
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let s = seen.clone();
        let _sub = bus.subscribe_auth(AuthEvent::TokenRefreshed, move |e| {
            s.lock().push(e.detail["userId"].as_str().unwrap_or_default().to_string());
        });

        coordinator
            .refresh_with(|| async {
                Ok(RefreshGrant {
                    access_token: "new".to_string(),
                    user: Some(user("u_2")),
                })
            })
            .await
            .unwrap();

        assert_eq!(*seen.lock(), vec!["u_2".to_string()]);
        assert_eq!(store.user().unwrap().id, "u_2");
    }

    #[tokio::test]
    async fn dropped_caller_does_not_cancel_shared_attempt() {
        let (store, _bus, coordinator) = setup();
        store.set_auth("old".to_string(), user("u_1"));
        let gate = Arc::new(Notify::new());

        let first = {
            let coordinator = coordinator.clone();
            let gate = gate.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_with(move || async move {
                        gate.notified().await;
                        Ok(RefreshGrant {
                            access_token: "new".to_string(),
                            user: None,
                        })
                    })
                    .await
            })
        };

        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }
        first.abort();

        let second = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_with(|| async {
                        Err(ApiError::new(codes::UNKNOWN_ERROR, "새 시도가 시작되면 안 됨", 500))
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;
        gate.notify_one();

        assert!(second.await.unwrap().is_ok());
        assert_eq!(coordinator.attempts_started(), 1);
    }

    #[tokio::test]
    async fn abandoned_attempt_still_settles() {
        let (store, _bus, coordinator) = setup();
        store.set_auth("old".to_string(), user("u_1"));

        let only_caller = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_with(|| async {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(RefreshGrant {
                            access_token: "new".to_string(),
                            user: None,
                        })
                    })
                    .await
            })
        };

        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }
        only_caller.abort();

        tokio::time::timeout(Duration::from_secs(2), async {
            while coordinator.is_refreshing() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("갱신 시도가 정산되지 않음");

        assert_eq!(store.access_token().as_deref(), Some("new"));
        assert_eq!(store.user().unwrap().id, "u_1");

        // 다음 갱신은 새 시도로 시작
        coordinator
            .refresh_with(|| async {
                Ok(RefreshGrant {
                    access_token: "newer".to_string(),
                    user: None,
                })
            })
            .await
            .unwrap();
        assert_eq!(coordinator.attempts_started(), 2);
        assert_eq!(store.access_token().as_deref(), Some("newer"));
    }
}
