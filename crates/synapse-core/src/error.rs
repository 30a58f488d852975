//! Synapse 핵심 에러 타입.
//!
//! 네트워크 레이어의 정규화 에러는 [`crate::models::api_error::ApiError`]를,
//! 리모트 로딩/렌더링 경로는 [`RemoteLoadError`], [`RenderError`]를 사용한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 저장소, 유효성 검증 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 키-값 저장소 읽기/쓰기 실패
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

/// 리모트 엔트리 포인트 로딩 실패.
///
/// 모듈 리졸버 구현이 반환한다. 셸은 원인을 구분하지 않고
/// 하나의 "사용 불가" 신호로 축약한다.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteLoadError {
    /// 리모트 자체에 도달할 수 없음 (오프라인, 네트워크 실패 등)
    #[error("리모트 '{remote}' 로드 실패: {reason}")]
    Unavailable {
        /// 리모트 이름
        remote: String,
        /// 실패 사유
        reason: String,
    },

    /// 리모트가 요청한 모듈을 노출하지 않음
    #[error("리모트 '{remote}'가 '{module}' 모듈을 노출하지 않음")]
    ModuleNotExposed {
        /// 리모트 이름
        remote: String,
        /// 요청한 모듈 이름
        module: String,
    },

    /// 리모트가 레지스트리에 등록되지 않음
    #[error("등록되지 않은 리모트: {0}")]
    UnknownRemote(String),
}

/// 컴포넌트 렌더링 실패.
///
/// 가장 가까운 에러 바운더리가 잡아서 폴백 뷰로 대체한다.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// 리모트 로딩이 실패해 대체 컴포넌트가 렌더링됨
    #[error("Remote '{remote}' is unavailable")]
    RemoteUnavailable {
        /// 로드에 실패한 리모트 이름
        remote: String,
    },

    /// 컴포넌트 내부 렌더링 실패
    #[error("렌더링 실패: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_unavailable_message_carries_remote_name() {
        let err = RenderError::RemoteUnavailable {
            remote: "reportsMfe".to_string(),
        };
        assert!(err.to_string().contains("reportsMfe"));
    }

    #[test]
    fn validation_display() {
        let err = CoreError::Validation {
            field: "events.namespace".to_string(),
            message: "비어 있음".to_string(),
        };
        assert!(err.to_string().contains("events.namespace"));
    }
}
