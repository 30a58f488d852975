//! # synapse-network
//!
//! 인증 백엔드와의 HTTP 통신 어댑터.
//! 모든 응답을 가로채 401이면 하나의 공유 리프레시 시도에 합류한 뒤
//! 원 요청을 한 번 재전송하고, 그 밖의 실패는 `ApiError`로 정규화한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use synapse_network::http_client::HttpApiClient;
//!
//! let client = HttpApiClient::new(&config.api, store.clone(), bus.clone())?;
//! client.login("admin@synapse.dev", "admin123").await?;
//! let menus = client.menus().await?;
//! ```

pub mod auth;
pub mod error_mapping;
pub mod http_client;
pub mod refresh;

pub use http_client::{ApiRequest, HttpApiClient};
pub use refresh::{RefreshCoordinator, RefreshGrant};
