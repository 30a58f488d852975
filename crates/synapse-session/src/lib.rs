//! # synapse-session
//!
//! 독립 배포된 애플리케이션들이 공유하는 세션 계층.
//!
//! - [`event_bus`] — 네임스페이스 기반 크로스 앱 이벤트 버스 (동기 디스패치)
//! - [`session_store`] — 액세스 토큰/사용자 신원 스토어 (탭 범위 영속)
//! - [`storage`] — `KeyValueStorage` 어댑터 (메모리, 파일)
//! - [`preferences`] — 테마/언어 환경설정 (영속)
//!
//! 모든 핸들은 전역 싱글턴이 아니라 셸의 조립 지점에서 생성되어 주입된다.

pub mod event_bus;
pub mod preferences;
pub mod session_store;
pub mod storage;

pub use event_bus::{EventBus, Subscription};
pub use session_store::SessionStore;
