//! 인프로세스 리모트 레지스트리.
//!
//! 페더레이션 런타임 대신 등록된 리모트와 노출 모듈을 해석한다.
//! 리모트별 가용성 토글로 오프라인 리모트를 흉내낼 수 있다.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use synapse_core::config::RemoteConfig;
use synapse_core::error::{RemoteLoadError, RenderError};
use synapse_core::models::remote::RemoteModuleRef;
use synapse_core::ports::module_resolver::{Component, ModuleResolver, RemoteModule};
use tracing::{debug, info};

/// 정적 마크업을 렌더링하는 리모트 페이지
#[derive(Debug, Clone)]
pub struct RemotePage {
    remote: String,
    title: String,
}

impl RemotePage {
    pub fn new(remote: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            title: title.into(),
        }
    }
}

impl Component for RemotePage {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn render(&self) -> Result<String, RenderError> {
        Ok(format!(
            "<section data-remote=\"{}\"><h1>{}</h1></section>",
            self.remote, self.title
        ))
    }
}

#[derive(Default)]
struct RegisteredRemote {
    available: bool,
    entry_url: Option<String>,
    modules: HashMap<String, Arc<dyn Component>>,
}

/// 리모트 레지스트리 — `ModuleResolver` 구현
#[derive(Clone, Default)]
pub struct RemoteRegistry {
    remotes: Arc<RwLock<BTreeMap<String, RegisteredRemote>>>,
}

impl RemoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정의 리모트마다 기본 페이지를 노출 모듈로 등록
    pub fn from_config(remotes: &[RemoteConfig]) -> Self {
        let registry = Self::new();
        for remote in remotes {
            registry.expose(
                &remote.module_ref(),
                Arc::new(RemotePage::new(remote.name.clone(), remote.name.clone())),
            );
            if let Some(url) = &remote.entry_url {
                registry.set_entry_url(&remote.name, url.clone());
            }
        }
        registry
    }

    /// 리모트의 노출 모듈 등록 (리모트가 없으면 사용 가능 상태로 생성)
    pub fn expose(&self, reference: &RemoteModuleRef, component: Arc<dyn Component>) {
        let mut remotes = self.remotes.write();
        let entry = remotes
            .entry(reference.remote_name.clone())
            .or_insert_with(|| RegisteredRemote {
                available: true,
                ..Default::default()
            });
        entry
            .modules
            .insert(reference.exposed_module.clone(), component);
        debug!("리모트 모듈 등록: {reference}");
    }

    fn set_entry_url(&self, remote: &str, url: String) {
        if let Some(entry) = self.remotes.write().get_mut(remote) {
            entry.entry_url = Some(url);
        }
    }

    /// 리모트 엔트리 URL
    pub fn entry_url(&self, remote: &str) -> Option<String> {
        self.remotes.read().get(remote)?.entry_url.clone()
    }

    /// 리모트 가용성 설정. 등록되지 않은 리모트면 `false`.
    pub fn set_available(&self, remote: &str, available: bool) -> bool {
        match self.remotes.write().get_mut(remote) {
            Some(entry) => {
                entry.available = available;
                info!("리모트 가용성 변경: {remote} → {available}");
                true
            }
            None => false,
        }
    }

    pub fn is_available(&self, remote: &str) -> bool {
        self.remotes
            .read()
            .get(remote)
            .map(|r| r.available)
            .unwrap_or(false)
    }

    /// 등록된 리모트 이름 (정렬)
    pub fn names(&self) -> Vec<String> {
        self.remotes.read().keys().cloned().collect()
    }
}

#[async_trait]
impl ModuleResolver for RemoteRegistry {
    async fn resolve(&self, reference: &RemoteModuleRef) -> Result<RemoteModule, RemoteLoadError> {
        let remotes = self.remotes.read();
        let entry = remotes
            .get(&reference.remote_name)
            .ok_or_else(|| RemoteLoadError::UnknownRemote(reference.remote_name.clone()))?;

        if !entry.available {
            return Err(RemoteLoadError::Unavailable {
                remote: reference.remote_name.clone(),
                reason: "remote entry unreachable".to_string(),
            });
        }

        let component = entry.modules.get(&reference.exposed_module).ok_or_else(|| {
            RemoteLoadError::ModuleNotExposed {
                remote: reference.remote_name.clone(),
                module: reference.exposed_module.clone(),
            }
        })?;

        Ok(RemoteModule {
            reference: reference.clone(),
            default_export: component.clone(),
        })
    }
}
