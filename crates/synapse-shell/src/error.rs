//! 셸 에러 타입.

use synapse_core::error::CoreError;
use synapse_core::models::api_error::ApiError;
use thiserror::Error;

/// 셸 조립/마운트 에러
#[derive(Debug, Error)]
pub enum ShellError {
    /// 설정/저장소 에러
    #[error(transparent)]
    Core(#[from] CoreError),

    /// API 호출 에러
    #[error(transparent)]
    Api(#[from] ApiError),

    /// 마운트되지 않은 리모트
    #[error("마운트되지 않은 리모트: {0}")]
    NotMounted(String),
}
