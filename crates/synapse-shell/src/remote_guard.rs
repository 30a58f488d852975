//! 리모트 로드 가드와 에러 바운더리.
//!
//! 리모트 엔트리 포인트 로딩이 실패하면 실패를 그 자리에서 전파하지 않고,
//! 렌더링 시점에 리모트 이름을 담은 에러를 내는 대체 컴포넌트로 바꾼다.
//! 에러는 가장 가까운 [`ErrorBoundary`]가 잡아 해당 마운트 지점에만 폴백을 보여준다.
//! 자동 재시도는 없다.

use async_trait::async_trait;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use synapse_core::models::remote::RemoteModuleRef;
use synapse_core::ports::module_resolver::{Component, ModuleResolver, RemoteModule};
use tracing::{debug, error, warn};

pub use synapse_core::error::{RemoteLoadError, RenderError};

/// 에러 바운더리 폴백 문구
pub const UNAVAILABLE_FALLBACK: &str = "This section is unavailable.";

/// 로드에 실패한 리모트를 대신하는 컴포넌트 — 렌더링하면 항상 실패한다
#[derive(Debug, Clone)]
pub struct UnavailableRemote {
    remote: String,
    display_name: String,
}

impl UnavailableRemote {
    pub fn new(remote: impl Into<String>) -> Self {
        let remote = remote.into();
        Self {
            display_name: format!("UnavailableRemote({remote})"),
            remote,
        }
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }
}

impl Component for UnavailableRemote {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn render(&self) -> Result<String, RenderError> {
        Err(RenderError::RemoteUnavailable {
            remote: self.remote.clone(),
        })
    }
}

/// 로딩 실패를 대체 모듈로 바꾸는 리졸버 데코레이터
pub struct GuardedResolver<R> {
    inner: R,
}

impl<R: ModuleResolver> GuardedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// 리모트 해석 — 실패해도 항상 모듈을 반환한다
    ///
    /// 실패 원인은 로그로만 남기고 구분하지 않는다.
    pub async fn load(&self, reference: &RemoteModuleRef) -> RemoteModule {
        match self.inner.resolve(reference).await {
            Ok(module) => {
                debug!("리모트 로드 성공: {reference}");
                module
            }
            Err(e) => {
                warn!("리모트 로드 실패, 대체 컴포넌트 사용: {reference}: {e}");
                RemoteModule {
                    reference: reference.clone(),
                    default_export: Arc::new(UnavailableRemote::new(
                        reference.remote_name.clone(),
                    )),
                }
            }
        }
    }
}

#[async_trait]
impl<R: ModuleResolver> ModuleResolver for GuardedResolver<R> {
    async fn resolve(&self, reference: &RemoteModuleRef) -> Result<RemoteModule, RemoteLoadError> {
        Ok(self.load(reference).await)
    }
}

/// 바운더리 렌더링 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryOutput {
    /// 바운더리 범위 (마운트 지점)
    pub scope: String,
    /// 렌더링된 마크업 (실패 시 폴백 문구)
    pub markup: String,
    /// 잡힌 에러
    pub caught: Option<RenderError>,
}

impl BoundaryOutput {
    pub fn is_fallback(&self) -> bool {
        self.caught.is_some()
    }
}

/// 하위 컴포넌트의 렌더링 실패를 잡아 폴백으로 대체하는 바운더리
#[derive(Debug, Clone)]
pub struct ErrorBoundary {
    scope: String,
}

impl ErrorBoundary {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// 하위 컴포넌트 렌더링. 에러와 패닉은 이 바운더리 밖으로 나가지 않는다.
    pub fn render(&self, child: &dyn Component) -> BoundaryOutput {
        let result = catch_unwind(AssertUnwindSafe(|| child.render())).unwrap_or_else(|_| {
            Err(RenderError::Failed(format!(
                "{} 렌더링 중 패닉",
                child.display_name()
            )))
        });

        match result {
            Ok(markup) => BoundaryOutput {
                scope: self.scope.clone(),
                markup,
                caught: None,
            },
            Err(e) => {
                error!(
                    "에러 바운더리 '{}'가 렌더링 실패를 잡음 ({}): {e}",
                    self.scope,
                    child.display_name()
                );
                BoundaryOutput {
                    scope: self.scope.clone(),
                    markup: UNAVAILABLE_FALLBACK.to_string(),
                    caught: Some(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    struct FailingResolver;

    #[async_trait]
    impl ModuleResolver for FailingResolver {
        async fn resolve(
            &self,
            reference: &RemoteModuleRef,
        ) -> Result<RemoteModule, RemoteLoadError> {
            Err(RemoteLoadError::Unavailable {
                remote: reference.remote_name.clone(),
                reason: "fetch failed".to_string(),
            })
        }
    }

    struct Static(&'static str);

    impl Component for Static {
        fn display_name(&self) -> &str {
            "Static"
        }
        fn render(&self) -> Result<String, RenderError> {
            Ok(self.0.to_string())
        }
    }

    struct Panicking;

    impl Component for Panicking {
        fn display_name(&self) -> &str {
            "Panicking"
        }
        fn render(&self) -> Result<String, RenderError> {
            panic!("boom")
        }
    }

    #[tokio::test]
    async fn failed_load_yields_component_that_names_the_remote() {
        let guarded = GuardedResolver::new(FailingResolver);
        let module = guarded.load(&RemoteModuleRef::app("reportsMfe")).await;

        let err = module.default_export.render().unwrap_err();
        assert_matches!(&err, RenderError::RemoteUnavailable { remote } if remote == "reportsMfe");
        assert!(err.to_string().contains("reportsMfe"));
    }

    #[tokio::test]
    async fn guarded_resolve_never_fails() {
        let guarded = GuardedResolver::new(FailingResolver);
        assert!(guarded
            .resolve(&RemoteModuleRef::app("dashboardMfe"))
            .await
            .is_ok());
    }

    #[test]
    fn boundary_renders_fallback_for_unavailable_remote() {
        let boundary = ErrorBoundary::new("/reports");
        let out = boundary.render(&UnavailableRemote::new("reportsMfe"));
        assert!(out.is_fallback());
        assert_eq!(out.markup, UNAVAILABLE_FALLBACK);
        assert_eq!(out.scope, "/reports");
    }

    #[test]
    fn boundary_passes_through_successful_render() {
        let out = ErrorBoundary::new("/dashboard").render(&Static("<dashboard/>"));
        assert!(!out.is_fallback());
        assert_eq!(out.markup, "<dashboard/>");
    }

    #[test]
    fn boundary_contains_panics() {
        let out = ErrorBoundary::new("/x").render(&Panicking);
        assert_matches!(out.caught, Some(RenderError::Failed(_)));
        assert_eq!(out.markup, UNAVAILABLE_FALLBACK);
    }
}
