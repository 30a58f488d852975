//! 애플리케이션 설정 구조체.
//!
//! API 서버 URL, 이벤트 네임스페이스, 리모트 목록, 저장소 경로 등
//! 런타임 설정을 정의한다. `ConfigManager`를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::event::DEFAULT_EVENT_NAMESPACE;
use crate::models::remote::{RemoteModuleRef, DEFAULT_EXPOSED_MODULE};

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API 서버 연결 설정
    pub api: ApiConfig,
    /// 크로스 앱 이벤트 설정
    #[serde(default)]
    pub events: EventConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 셸이 마운트할 리모트 목록
    #[serde(default)]
    pub remotes: Vec<RemoteConfig>,
    /// 알림 설정
    #[serde(default)]
    pub notification: NotificationConfig,
    /// mock API 서버 설정
    #[serde(default)]
    pub mock_api: MockApiConfig,
}

/// API 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 서버 기본 URL (예: "http://localhost:3100")
    pub base_url: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// 크로스 앱 이벤트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// 이벤트 이름 접두어
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 영속 환경설정 파일 경로 (None이면 플랫폼 데이터 디렉토리)
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

/// 리모트 등록 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// 리모트 이름 (예: "reportsMfe")
    pub name: String,
    /// 노출 모듈 이름
    #[serde(default = "default_exposed_module")]
    pub exposed_module: String,
    /// 셸 라우트 접두어 (예: "/reports")
    pub route: String,
    /// 리모트 엔트리 URL (페더레이션 런타임이 사용)
    #[serde(default)]
    pub entry_url: Option<String>,
}

impl RemoteConfig {
    pub fn module_ref(&self) -> RemoteModuleRef {
        RemoteModuleRef::new(self.name.clone(), self.exposed_module.clone())
    }
}

/// 알림 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 보관할 최대 알림 수 (초과 시 오래된 것부터 제거)
    #[serde(default = "default_max_notifications")]
    pub max_items: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_notifications(),
        }
    }
}

/// mock API 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockApiConfig {
    /// 바인드 호스트
    #[serde(default = "default_mock_host")]
    pub host: String,
    /// 바인드 포트
    #[serde(default = "default_mock_port")]
    pub port: u16,
    /// 리프레시 응답 지연 (밀리초, 동시성 테스트용)
    #[serde(default)]
    pub refresh_delay_ms: u64,
}

impl Default for MockApiConfig {
    fn default() -> Self {
        Self {
            host: default_mock_host(),
            port: default_mock_port(),
            refresh_delay_ms: 0,
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_namespace() -> String {
    DEFAULT_EVENT_NAMESPACE.to_string()
}

fn default_exposed_module() -> String {
    DEFAULT_EXPOSED_MODULE.to_string()
}

fn default_max_notifications() -> usize {
    50
}

fn default_mock_host() -> String {
    "127.0.0.1".to_string()
}

fn default_mock_port() -> u16 {
    3100
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:3100".to_string(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            events: EventConfig::default(),
            storage: StorageConfig::default(),
            remotes: vec![
                RemoteConfig {
                    name: "dashboardMfe".to_string(),
                    exposed_module: default_exposed_module(),
                    route: "/dashboard".to_string(),
                    entry_url: Some("http://localhost:4201/remoteEntry.js".to_string()),
                },
                RemoteConfig {
                    name: "reportsMfe".to_string(),
                    exposed_module: default_exposed_module(),
                    route: "/reports".to_string(),
                    entry_url: Some("http://localhost:4202/remoteEntry.js".to_string()),
                },
            ],
            notification: NotificationConfig::default(),
            mock_api: MockApiConfig::default(),
        }
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(CoreError::Validation {
                field: "api.base_url".to_string(),
                message: format!("http(s) URL이어야 함: {}", self.api.base_url),
            });
        }

        if self.api.request_timeout_ms == 0 {
            return Err(CoreError::Validation {
                field: "api.request_timeout_ms".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }

        let namespace = &self.events.namespace;
        if namespace.is_empty() || namespace.contains(':') {
            return Err(CoreError::Validation {
                field: "events.namespace".to_string(),
                message: format!("비어 있지 않고 ':'를 포함하지 않아야 함: {namespace:?}"),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for remote in &self.remotes {
            if !seen.insert(remote.name.as_str()) {
                return Err(CoreError::Validation {
                    field: "remotes".to_string(),
                    message: format!("중복된 리모트 이름: {}", remote.name),
                });
            }
            if !remote.route.starts_with('/') {
                return Err(CoreError::Validation {
                    field: format!("remotes.{}.route", remote.name),
                    message: format!("'/'로 시작해야 함: {}", remote.route),
                });
            }
        }

        if self.notification.max_items == 0 {
            return Err(CoreError::Validation {
                field: "notification.max_items".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }

        Ok(())
    }
}
