//! 키-값 저장소 포트.
//!
//! 구현: `synapse-session` crate (`MemoryStorage` — 탭 범위, `FileStorage` — 영속)

use crate::error::CoreError;

/// 동기 키-값 저장소
///
/// 세션 스토어는 모든 변경을 동기적으로 기록하므로 async가 아니다.
pub trait KeyValueStorage: Send + Sync {
    /// 값 조회 (없으면 `None`)
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장 (덮어쓰기)
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 값 삭제 (없으면 no-op)
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}
