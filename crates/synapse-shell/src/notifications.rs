//! 셸 알림 센터.
//!
//! 최대 개수를 넘으면 가장 오래된 알림부터 버린다.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use synapse_core::models::notification::{Notification, NotificationLevel};
use tracing::debug;

/// 알림 센터 (복제 가능한 핸들)
#[derive(Clone)]
pub struct NotificationCenter {
    items: Arc<Mutex<VecDeque<Notification>>>,
    max_items: usize,
}

impl NotificationCenter {
    pub fn new(max_items: usize) -> Self {
        Self {
            items: Arc::new(Mutex::new(VecDeque::with_capacity(max_items))),
            max_items: max_items.max(1),
        }
    }

    /// 알림 추가 후 ID 반환
    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) -> String {
        let notification = Notification::new(level, message);
        let id = notification.id.clone();
        debug!("알림 추가 ({:?}): {}", notification.level, notification.message);

        let mut items = self.items.lock();
        while items.len() >= self.max_items {
            items.pop_front();
        }
        items.push_back(notification);
        id
    }

    /// 알림 제거. 없으면 `false`.
    pub fn dismiss(&self, id: &str) -> bool {
        let mut items = self.items.lock();
        match items.iter().position(|n| n.id == id) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    /// 오래된 순 목록
    pub fn list(&self) -> Vec<Notification> {
        self.items.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.items.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}
