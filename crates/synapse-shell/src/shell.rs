//! 리모트 마운트와 렌더링.
//!
//! 리모트마다 별도의 [`ErrorBoundary`] 안에서 렌더링하므로 한 리모트의 실패가
//! 형제 리모트나 셸에 번지지 않는다. 재시도는 `remount`로만 한다.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use synapse_core::models::remote::RemoteModuleRef;
use synapse_core::ports::module_resolver::{ModuleResolver, RemoteModule};
use tracing::{debug, info};

use crate::error::ShellError;
use crate::remote_guard::{BoundaryOutput, ErrorBoundary, GuardedResolver};
use crate::router::RemoteRouter;

struct Mount {
    route: String,
    module: RemoteModule,
}

/// 렌더링된 마운트 지점
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedSection {
    pub remote: String,
    pub route: String,
    pub output: BoundaryOutput,
}

/// 호스트 셸
pub struct Shell<R> {
    resolver: GuardedResolver<R>,
    router: RemoteRouter,
    mounts: RwLock<BTreeMap<String, Mount>>,
}

impl<R: ModuleResolver> Shell<R> {
    pub fn new(resolver: R, router: RemoteRouter) -> Self {
        Self {
            resolver: GuardedResolver::new(resolver),
            router,
            mounts: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn resolver(&self) -> &GuardedResolver<R> {
        &self.resolver
    }

    pub fn router(&self) -> &RemoteRouter {
        &self.router
    }

    /// 리모트를 라우트에 마운트 (이미 있으면 교체)
    pub async fn mount(&self, reference: &RemoteModuleRef, route: &str) {
        let module = self.resolver.load(reference).await;
        self.mounts.write().insert(
            reference.remote_name.clone(),
            Mount {
                route: route.to_string(),
                module,
            },
        );
        debug!("리모트 마운트: {reference} @ {route}");
    }

    /// 이름으로 마운트 — 라우터에 등록된 라우트를 쓰고, 없으면 `/<name>`
    pub async fn mount_remote(&self, remote: &str) {
        let found = self
            .router
            .routes()
            .find(|(_, target)| target.remote_name == remote)
            .map(|(prefix, target)| (prefix.to_string(), target.clone()));

        let (route, reference) =
            found.unwrap_or_else(|| (format!("/{remote}"), RemoteModuleRef::app(remote)));
        self.mount(&reference, &route).await;
    }

    /// 라우터의 모든 리모트 마운트
    pub async fn mount_all(&self) {
        let routes: Vec<(String, RemoteModuleRef)> = self
            .router
            .routes()
            .map(|(prefix, target)| (prefix.to_string(), target.clone()))
            .collect();

        for (route, reference) in routes {
            self.mount(&reference, &route).await;
        }
    }

    /// 경로로 이동 — 담당 리모트를 (필요하면 마운트 후) 렌더링
    pub async fn navigate(&self, path: &str) -> Option<MountedSection> {
        let (route, reference) = self
            .router
            .resolve_route(path)
            .map(|(prefix, target)| (prefix.to_string(), target.clone()))?;
        let mounted = self.mounts.read().contains_key(&reference.remote_name);
        if !mounted {
            self.mount(&reference, &route).await;
        }
        self.render(&reference.remote_name)
    }

    /// 마운트된 리모트 하나 렌더링
    pub fn render(&self, remote: &str) -> Option<MountedSection> {
        let mounts = self.mounts.read();
        let mount = mounts.get(remote)?;
        Some(render_mount(remote, mount))
    }

    /// 마운트된 모든 리모트 렌더링 (이름순)
    pub fn render_all(&self) -> Vec<MountedSection> {
        self.mounts
            .read()
            .iter()
            .map(|(remote, mount)| render_mount(remote, mount))
            .collect()
    }

    /// 리모트를 다시 해석해 마운트 후 렌더링
    pub async fn remount(&self, remote: &str) -> Result<MountedSection, ShellError> {
        let (reference, route) = {
            let mounts = self.mounts.read();
            let mount = mounts
                .get(remote)
                .ok_or_else(|| ShellError::NotMounted(remote.to_string()))?;
            (mount.module.reference.clone(), mount.route.clone())
        };

        info!("리모트 재마운트: {reference}");
        self.mount(&reference, &route).await;
        self.render(remote)
            .ok_or_else(|| ShellError::NotMounted(remote.to_string()))
    }

    /// 마운트 해제
    pub fn unmount(&self, remote: &str) -> bool {
        self.mounts.write().remove(remote).is_some()
    }

    pub fn mounted(&self) -> Vec<String> {
        self.mounts.read().keys().cloned().collect()
    }
}

fn render_mount(remote: &str, mount: &Mount) -> MountedSection {
    let boundary = ErrorBoundary::new(mount.route.clone());
    MountedSection {
        remote: remote.to_string(),
        route: mount.route.clone(),
        output: boundary.render(mount.module.default_export.as_ref()),
    }
}
