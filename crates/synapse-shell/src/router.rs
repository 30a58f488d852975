//! 경로 → 리모트 라우팅.
//!
//! 라우트 접두어 중 가장 긴 것이 이긴다. 접두어는 세그먼트 경계에서만 일치한다
//! (`/reports`는 `/reports/monthly`와 일치하지만 `/reportsx`와는 일치하지 않음).

use synapse_core::config::RemoteConfig;
use synapse_core::models::remote::RemoteModuleRef;

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    target: RemoteModuleRef,
}

/// 리모트 라우터
#[derive(Debug, Clone, Default)]
pub struct RemoteRouter {
    routes: Vec<Route>,
}

impl RemoteRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(remotes: &[RemoteConfig]) -> Self {
        let mut router = Self::new();
        for remote in remotes {
            router.add(&remote.route, remote.module_ref());
        }
        router
    }

    /// 라우트 추가. 같은 접두어가 있으면 대상을 교체한다.
    pub fn add(&mut self, prefix: &str, target: RemoteModuleRef) {
        let prefix = normalize(prefix);
        match self.routes.iter_mut().find(|r| r.prefix == prefix) {
            Some(existing) => existing.target = target,
            None => self.routes.push(Route { prefix, target }),
        }
    }

    /// 경로를 담당하는 리모트 (가장 긴 접두어 일치)
    pub fn resolve(&self, path: &str) -> Option<&RemoteModuleRef> {
        self.resolve_route(path).map(|(_, target)| target)
    }

    /// 경로를 담당하는 `(접두어, 리모트)`
    pub fn resolve_route(&self, path: &str) -> Option<(&str, &RemoteModuleRef)> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        self.routes
            .iter()
            .filter(|r| matches_prefix(&r.prefix, path))
            .max_by_key(|r| r.prefix.len())
            .map(|r| (r.prefix.as_str(), &r.target))
    }

    /// 등록된 `(접두어, 리모트)` 목록
    pub fn routes(&self) -> impl Iterator<Item = (&str, &RemoteModuleRef)> {
        self.routes.iter().map(|r| (r.prefix.as_str(), &r.target))
    }
}

fn normalize(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn matches_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
