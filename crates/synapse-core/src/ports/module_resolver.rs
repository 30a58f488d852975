//! 모듈 리졸버 포트.
//!
//! `(remote_name, exposed_module)`을 받아 리모트 모듈을 비동기로 해석한다.
//! 번들러/페더레이션 런타임과 무관한 추상화이며,
//! 구현: `synapse-shell` crate (`RemoteRegistry`, `GuardedResolver` 데코레이터)

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::{RemoteLoadError, RenderError};
use crate::models::remote::RemoteModuleRef;

/// 렌더링 가능한 UI 컴포넌트
pub trait Component: Send + Sync {
    /// 디버그/로그용 이름
    fn display_name(&self) -> &str;

    /// 마크업 렌더링
    fn render(&self) -> Result<String, RenderError>;
}

/// 해석된 리모트 모듈
#[derive(Clone)]
pub struct RemoteModule {
    /// 어떤 엔트리 포인트에서 왔는지
    pub reference: RemoteModuleRef,
    /// default export 컴포넌트
    pub default_export: Arc<dyn Component>,
}

impl fmt::Debug for RemoteModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteModule")
            .field("reference", &self.reference)
            .field("default_export", &self.default_export.display_name())
            .finish()
    }
}

/// 리모트 모듈 리졸버
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    /// 리모트 엔트리 포인트 해석
    async fn resolve(&self, reference: &RemoteModuleRef) -> Result<RemoteModule, RemoteLoadError>;
}
