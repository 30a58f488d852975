//! # synapse-shell
//!
//! 독립 배포된 리모트 애플리케이션을 런타임에 마운트하는 호스트 셸.
//!
//! - [`remote_guard`] — 로드 실패를 대체 컴포넌트로 바꾸는 리졸버 데코레이터, 에러 바운더리
//! - [`registry`] — 인프로세스 리모트 레지스트리 (`ModuleResolver` 구현)
//! - [`router`] — 라우트 접두어 → 리모트 매핑
//! - [`shell`] — 마운트/렌더링/재마운트
//! - [`notifications`] — 알림 센터
//! - [`context`] — 공유 핸들 조립 지점

pub mod context;
pub mod error;
pub mod notifications;
pub mod registry;
pub mod remote_guard;
pub mod router;
pub mod shell;

pub use context::ShellContext;
pub use error::ShellError;
pub use shell::{MountedSection, Shell};
