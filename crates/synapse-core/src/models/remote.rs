//! 리모트(페더레이션 애플리케이션) 참조 모델.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 기본 노출 모듈 이름
pub const DEFAULT_EXPOSED_MODULE: &str = "./App";

/// 리모트 엔트리 포인트 식별자 — `(remote_name, exposed_module)`
///
/// 해석과 캐싱은 모듈 리졸버 몫이며, 이 타입은 식별만 한다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteModuleRef {
    /// 리모트 이름 (예: "reportsMfe")
    pub remote_name: String,
    /// 노출 모듈 이름 (예: "./App")
    pub exposed_module: String,
}

impl RemoteModuleRef {
    pub fn new(remote_name: impl Into<String>, exposed_module: impl Into<String>) -> Self {
        Self {
            remote_name: remote_name.into(),
            exposed_module: exposed_module.into(),
        }
    }

    /// 기본 노출 모듈(`./App`)을 가리키는 참조
    pub fn app(remote_name: impl Into<String>) -> Self {
        Self::new(remote_name, DEFAULT_EXPOSED_MODULE)
    }
}

impl fmt::Display for RemoteModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let module = self.exposed_module.trim_start_matches("./");
        write!(f, "{}/{}", self.remote_name, module)
    }
}
