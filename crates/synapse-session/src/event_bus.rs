//! 크로스 앱 이벤트 버스.
//!
//! 셸이 소유하고 각 리모트에 주입하는 명시적 publish/subscribe 레지스트리.
//! 디스패치는 호출 스레드에서 등록 순서대로 동기 실행되며 큐잉하지 않는다.
//! 디스패치 이후에 등록된 리스너는 그 이벤트를 받지 못한다.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use synapse_core::models::event::{AuthEvent, BusinessEvent, CrossAppEvent};
use tracing::{debug, error};

type Handler = Arc<dyn Fn(&CrossAppEvent) + Send + Sync>;

struct Listener {
    id: u64,
    active: Arc<AtomicBool>,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<String, Vec<Listener>>,
}

impl Registry {
    fn remove(&mut self, name: &str, id: u64) -> bool {
        let Some(list) = self.listeners.get_mut(name) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(name);
        }
        removed
    }
}

/// 크로스 앱 이벤트 버스 (복제 가능한 핸들)
#[derive(Clone)]
pub struct EventBus {
    namespace: Arc<str>,
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace: String = namespace.into();
        Self {
            namespace: Arc::from(namespace),
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// 이벤트 네임스페이스
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// 이벤트 구독
    ///
    /// 반환된 [`Subscription`]을 drop해도 구독은 유지된다.
    /// 소비자의 해제 경로에서 `unsubscribe()`를 호출해야 한다.
    pub fn subscribe<F>(&self, name: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&CrossAppEvent) + Send + Sync + 'static,
    {
        let name = name.into();
        let active = Arc::new(AtomicBool::new(true));

        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .listeners
                .entry(name.clone())
                .or_default()
                .push(Listener {
                    id,
                    active: active.clone(),
                    handler: Arc::new(handler),
                });
            id
        };

        debug!("이벤트 구독: {name} (id={id})");
        Subscription {
            registry: Arc::downgrade(&self.registry),
            name,
            id,
            active,
        }
    }

    /// 인증 이벤트 구독
    pub fn subscribe_auth<F>(&self, event: AuthEvent, handler: F) -> Subscription
    where
        F: Fn(&CrossAppEvent) + Send + Sync + 'static,
    {
        self.subscribe(event.event_name(&self.namespace), handler)
    }

    /// 이벤트 디스패치 — 호출된 핸들러 수 반환
    ///
    /// 구독자가 없으면 no-op. 핸들러 패닉은 로그만 남기고 다음 핸들러로 진행한다.
    pub fn dispatch(&self, name: impl Into<String>, detail: Value) -> usize {
        let event = CrossAppEvent::new(name, detail);

        // 스냅샷 후 락 해제: 핸들러가 구독/해제를 해도 데드락이 없다
        let snapshot: Vec<(Arc<AtomicBool>, Handler)> = {
            let registry = self.registry.lock();
            match registry.listeners.get(&event.name) {
                Some(list) => list
                    .iter()
                    .map(|l| (l.active.clone(), l.handler.clone()))
                    .collect(),
                None => Vec::new(),
            }
        };

        let mut invoked = 0;
        for (active, handler) in snapshot {
            // 디스패치 도중 해제된 리스너는 건너뛴다
            if !active.load(Ordering::Acquire) {
                continue;
            }
            invoked += 1;
            if catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                error!("이벤트 핸들러 패닉: {}", event.name);
            }
        }

        debug!("이벤트 디스패치: {} → {invoked}개 핸들러", event.name);
        invoked
    }

    /// 인증 이벤트 디스패치
    pub fn dispatch_auth(&self, event: AuthEvent, detail: Value) -> usize {
        self.dispatch(event.event_name(&self.namespace), detail)
    }

    /// 비즈니스 이벤트 디스패치
    pub fn dispatch_business(&self, event: BusinessEvent, detail: Value) -> usize {
        self.dispatch(event.event_name(&self.namespace), detail)
    }

    /// 이벤트 이름별 리스너 수
    pub fn listener_count(&self, name: &str) -> usize {
        self.registry
            .lock()
            .listeners
            .get(name)
            .map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(synapse_core::models::event::DEFAULT_EVENT_NAMESPACE)
    }
}

/// 구독 핸들
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    name: String,
    id: u64,
    active: Arc<AtomicBool>,
}

impl Subscription {
    /// 구독한 이벤트 이름
    pub fn event_name(&self) -> &str {
        &self.name
    }

    /// 구독 활성 여부
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// 구독 해제 — 이미 해제됐으면 false (멱등)
    pub fn unsubscribe(&self) -> bool {
        if !self.active.swap(false, Ordering::AcqRel) {
            return false;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(&self.name, self.id);
        }
        debug!("이벤트 구독 해제: {} (id={})", self.name, self.id);
        true
    }
}
