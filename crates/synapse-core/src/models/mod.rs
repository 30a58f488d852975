//! Synapse 도메인 모델.
//!
//! 셸, 리모트 애플리케이션, 인증 백엔드 간에 공유하는 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod api_error;
pub mod event;
pub mod menu;
pub mod notification;
pub mod preference;
pub mod remote;
pub mod session;
