//! # synapse-shell
//!
//! 호스트 셸 바이너리 진입점.
//! 로그인 → 메뉴 조회 → 리모트 마운트 → 섹션 렌더링 결과 출력.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use synapse_core::config::AppConfig;
use synapse_core::config_manager::ConfigManager;
use synapse_core::models::menu::MenuItem;
use synapse_core::ports::storage::KeyValueStorage;
use synapse_session::storage::{FileStorage, MemoryStorage};
use synapse_shell::registry::RemoteRegistry;
use synapse_shell::router::RemoteRouter;
use synapse_shell::{Shell, ShellContext};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 환경설정 파일 이름 (데이터 디렉토리 기준)
const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Synapse 호스트 셸
#[derive(Parser, Debug)]
#[command(name = "synapse-shell")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API 서버 URL 지정 (기본: http://localhost:3100)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 로그인 이메일
    #[arg(long, short = 'e')]
    email: Option<String>,

    /// 로그인 비밀번호
    #[arg(long, short = 'p')]
    password: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 사용 불가로 표시할 리모트 (반복 가능)
    #[arg(long = "offline-remote")]
    offline_remotes: Vec<String>,
}

/// 설정 로드 — 실패하면 기본 설정
fn load_config(path: Option<PathBuf>) -> AppConfig {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    match manager {
        Ok(manager) => {
            info!("설정 파일: {}", manager.config_path().display());
            manager.get()
        }
        Err(e) => {
            warn!("설정 로드 실패, 기본 설정 사용: {e}");
            AppConfig::default_config()
        }
    }
}

/// 영속 환경설정 저장소 (파일, 실패 시 메모리)
fn open_preferences(config: &AppConfig) -> Arc<dyn KeyValueStorage> {
    let path = config.storage.preferences_path.clone().or_else(|| {
        ConfigManager::data_dir()
            .ok()
            .map(|dir| dir.join(PREFERENCES_FILE_NAME))
    });

    match path.map(FileStorage::open) {
        Some(Ok(storage)) => Arc::new(storage),
        Some(Err(e)) => {
            warn!("환경설정 파일 열기 실패, 메모리 저장소 사용: {e}");
            Arc::new(MemoryStorage::new())
        }
        None => Arc::new(MemoryStorage::new()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "synapse_shell={},synapse_network={},synapse_session={},synapse_core={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let mut config = load_config(args.config);

    // CLI 인자로 설정 오버라이드
    if let Some(server) = args.server {
        config.api.base_url = server;
    }
    info!("서버: {}", config.api.base_url);

    let preferences = open_preferences(&config);
    let ctx = ShellContext::bootstrap(config, Arc::new(MemoryStorage::new()), preferences)?;
    info!(
        "환경설정: theme={}, language={}",
        ctx.preferences().theme().as_str(),
        ctx.preferences().language()
    );

    if let (Some(email), Some(password)) = (&args.email, &args.password) {
        let user = ctx.api().login(email, password).await?;
        println!("로그인: {} ({})", user.name, user.email);
    }

    let remotes = &ctx.config().remotes;
    let registry = RemoteRegistry::from_config(remotes);
    for remote in &args.offline_remotes {
        if !registry.set_available(remote, false) {
            warn!("등록되지 않은 리모트: {remote}");
        }
    }
    let shell = Shell::new(registry, RemoteRouter::from_config(remotes));

    if ctx.login_required() {
        warn!("로그인 필요 — --email/--password 지정. 설정된 리모트만 마운트");
        shell.mount_all().await;
    } else {
        match ctx.api().menus().await {
            Ok(menus) => {
                for remote in MenuItem::collect_remotes(&menus) {
                    shell.mount_remote(&remote).await;
                }
            }
            Err(e) => {
                warn!("메뉴 조회 실패, 설정된 리모트 마운트: {e}");
                shell.mount_all().await;
            }
        }
    }

    for section in shell.render_all() {
        let marker = if section.output.is_fallback() { "!" } else { " " };
        println!(
            "{marker} [{}] {} → {}",
            section.route, section.remote, section.output.markup
        );
    }

    for notification in ctx.notifications().list() {
        println!("알림 ({:?}): {}", notification.level, notification.message);
    }

    Ok(())
}
