//! 알림 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 알림 레벨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 사용자에게 표시할 알림
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// 알림 ID
    pub id: String,
    /// 레벨
    pub level: NotificationLevel,
    /// 본문
    pub message: String,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// 새 알림 생성 (ID 자동 할당)
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}
