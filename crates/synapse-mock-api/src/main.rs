//! # synapse-mock-api
//!
//! 로컬 mock 인증 백엔드 바이너리 진입점.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use synapse_core::config::AppConfig;
use synapse_core::config_manager::ConfigManager;
use synapse_mock_api::MockApiState;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Synapse mock 인증 백엔드
#[derive(Parser, Debug)]
#[command(name = "synapse-mock-api")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 바인드 호스트 (기본: 설정 파일 값)
    #[arg(long)]
    host: Option<String>,

    /// 바인드 포트 (기본: 설정 파일 값)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 리프레시 응답 지연 (밀리초)
    #[arg(long)]
    refresh_delay_ms: Option<u64>,

    /// 리프레시 응답에서 user 필드 생략
    #[arg(long)]
    omit_user_on_refresh: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "synapse_mock_api={},tower_http={}",
        args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let mut config = match args.config {
        Some(path) => ConfigManager::with_path(path)
            .context("설정 파일 로드 실패")?
            .get()
            .mock_api,
        None => match ConfigManager::new() {
            Ok(manager) => manager.get().mock_api,
            Err(e) => {
                warn!("설정 로드 실패, 기본값 사용: {e}");
                AppConfig::default_config().mock_api
            }
        },
    };

    // CLI 인자로 설정 오버라이드
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(delay) = args.refresh_delay_ms {
        config.refresh_delay_ms = delay;
    }

    let state =
        MockApiState::new().with_refresh_delay(Duration::from_millis(config.refresh_delay_ms));
    state.set_omit_user_on_refresh(args.omit_user_on_refresh);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("{addr} 바인드 실패"))?;

    info!("시드 계정: admin@synapse.dev / admin123, user@synapse.dev / user123");

    synapse_mock_api::serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("종료 신호 대기 실패: {e}");
        }
        info!("종료 신호 수신");
    })
    .await?;

    Ok(())
}
