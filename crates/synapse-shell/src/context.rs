//! 셸 조립 지점.
//!
//! 이벤트 버스, 세션 스토어, API 클라이언트, 환경설정, 알림 센터를
//! 한 곳에서 생성하고 핸들을 나눠준다. 전역 싱글턴은 없다.

use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use synapse_core::config::AppConfig;
use synapse_core::models::event::{AuthEvent, BusinessEvent};
use synapse_core::models::notification::NotificationLevel;
use synapse_core::ports::storage::KeyValueStorage;
use synapse_network::auth::EXPLICIT_LOGOUT_REASON;
use synapse_network::HttpApiClient;
use synapse_session::preferences::PreferenceStore;
use synapse_session::{EventBus, SessionStore, Subscription};
use tracing::{debug, info};

use crate::error::ShellError;
use crate::notifications::NotificationCenter;

/// 세션 만료 알림 문구
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// 셸 공유 핸들 묶음
pub struct ShellContext {
    config: AppConfig,
    events: EventBus,
    store: Arc<SessionStore>,
    api: HttpApiClient,
    preferences: PreferenceStore,
    notifications: NotificationCenter,
    login_required: Arc<AtomicBool>,
    subscriptions: Vec<Subscription>,
}

impl ShellContext {
    /// 셸 조립
    ///
    /// - `tab_storage`: 세션 토큰용 탭 범위 저장소
    /// - `persistent_storage`: 테마/언어 환경설정용 영속 저장소
    pub fn bootstrap(
        config: AppConfig,
        tab_storage: Arc<dyn KeyValueStorage>,
        persistent_storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, ShellError> {
        config.validate()?;

        let events = EventBus::new(config.events.namespace.clone());
        let store = Arc::new(SessionStore::hydrate(tab_storage));
        let api = HttpApiClient::new(&config.api, store.clone(), events.clone())?;
        let preferences = PreferenceStore::new(persistent_storage);
        let notifications = NotificationCenter::new(config.notification.max_items);
        let login_required = Arc::new(AtomicBool::new(!store.is_authenticated()));

        let on_logout = {
            let notifications = notifications.clone();
            let login_required = login_required.clone();
            events.subscribe_auth(AuthEvent::UserLoggedOut, move |event| {
                login_required.store(true, Ordering::SeqCst);
                let reason = event.detail["reason"].as_str().unwrap_or_default();
                if reason != EXPLICIT_LOGOUT_REASON {
                    notifications.push(NotificationLevel::Warning, SESSION_EXPIRED_MESSAGE);
                }
            })
        };
        let on_login = {
            let login_required = login_required.clone();
            events.subscribe_auth(AuthEvent::UserLoggedIn, move |_| {
                login_required.store(false, Ordering::SeqCst);
            })
        };

        info!(
            "셸 조립 완료: namespace={}, authenticated={}",
            events.namespace(),
            store.is_authenticated()
        );

        Ok(Self {
            config,
            events,
            store,
            api,
            preferences,
            notifications,
            login_required,
            subscriptions: vec![on_logout, on_login],
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 리모트에 주입할 이벤트 버스 핸들
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn api(&self) -> &HttpApiClient {
        &self.api
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// 로그인 화면으로 보내야 하는지 (복원된 세션이 없거나 로그아웃됨)
    pub fn login_required(&self) -> bool {
        self.login_required.load(Ordering::SeqCst)
    }

    /// 주문 생성 같은 비즈니스 이벤트를 리모트 간에 알림
    pub fn announce_order_created(&self, order_id: &str) -> usize {
        self.events
            .dispatch_business(BusinessEvent::OrderCreated, json!({ "orderId": order_id }))
    }

    /// 셸이 등록한 구독 해제
    pub fn shutdown(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        debug!("셸 구독 해제");
    }
}

impl Drop for ShellContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}
