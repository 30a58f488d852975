//! # synapse-mock-api
//!
//! 로컬 개발과 통합 테스트용 인증 백엔드.
//! Axum 기반 REST API, 인메모리 토큰 저장.
//!
//! ## 엔드포인트
//! - `POST /api/v1/auth/login` — 로그인, 리프레시 쿠키 발급
//! - `POST /api/v1/auth/refresh` — 쿠키로 액세스 토큰 재발급
//! - `POST /api/v1/auth/logout` — 리프레시 토큰 폐기
//! - `GET /api/v1/menus` — 내비게이션 메뉴 (Bearer 필요)

pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use state::MockApiState;

/// API 라우터 생성
pub fn router(state: MockApiState) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/menus", get(handlers::menus::list_menus))
        // 쿠키 전송을 위해 Origin 미러링 + credentials 허용
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 종료 신호가 올 때까지 서버 실행
pub async fn serve<F>(
    listener: TcpListener,
    state: MockApiState,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("mock API 서버 시작: http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("mock API 서버 종료");
    Ok(())
}

/// 백그라운드에서 실행 중인 서버 (drop 시 중단)
pub struct SpawnedServer {
    pub addr: SocketAddr,
    pub state: MockApiState,
    handle: JoinHandle<()>,
}

impl SpawnedServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for SpawnedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// 임의 포트(127.0.0.1:0)에 바인드해 백그라운드 실행
pub async fn spawn(state: MockApiState) -> Result<SpawnedServer, std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_state = state.clone();

    let handle = tokio::spawn(async move {
        if let Err(e) = serve(listener, server_state, std::future::pending()).await {
            warn!("mock API 서버 에러: {e}");
        }
    });

    Ok(SpawnedServer {
        addr,
        state,
        handle,
    })
}
