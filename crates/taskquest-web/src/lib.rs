//! # taskquest-web
//!
//! 로컬 루프백 API 서버.
//! Axum 기반으로 포그라운드 앱과 워커를 잇는다.
//!
//! ## 기능
//! - 워커 메시지 수신 (`POST /api/messages`)
//! - 스케줄러 상태, 알림 미리보기, 알림 클릭 처리
//! - 앱 창 SSE 등록 (클릭 시 포커스 대상)
//! - 캐시 우선 정적 자산 서빙 (fallback)

pub mod error;
pub mod handlers;
pub mod registry;
pub mod routes;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use taskquest_core::config::WebConfig;
use taskquest_core::ports::window::WindowClients;
use taskquest_worker::cache_manager::CacheManager;
use taskquest_worker::gateway::GatewayHandle;
use taskquest_worker::scheduler::NotificationScheduler;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub use registry::{ClientEvent, ClientRegistry};

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 워커 메시지 게이트웨이
    pub gateway: GatewayHandle,
    /// 주기 알림 스케줄러
    pub scheduler: Arc<NotificationScheduler>,
    /// 정적 자산 캐시
    pub cache: Arc<CacheManager>,
    /// SSE로 등록된 앱 창
    pub clients: ClientRegistry,
    /// 클릭 라우팅에 쓰는 창 제어 어댑터
    pub windows: Arc<dyn WindowClients>,
    /// 포그라운드 앱 origin
    pub app_origin: String,
}

/// 라우터 구성 (API + 캐시 fallback + 미들웨어)
pub fn build_router(state: AppState) -> Router {
    // CORS 설정 (포그라운드 앱 dev 서버에서 호출)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes())
        .fallback(handlers::assets::serve_cached)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 로컬 API 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(state: AppState, config: WebConfig) -> Self {
        Self { config, state }
    }

    /// 서버 실행
    ///
    /// 기본 포트에서 시작하여, 포트가 이미 사용 중이면 다음 포트를 시도합니다.
    /// 최대 10개 포트를 시도한 후 실패하면 에러를 반환합니다.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let app = build_router(self.state);

        // 포트 바인드 시도 (최대 MAX_PORT_ATTEMPTS번)
        let base_port = self.config.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            // 포트 오버플로우 체크
            let Some(port) = base_port.checked_add(attempt) else {
                break;
            };

            let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {}:{}: {}", host, port, e);
                    continue;
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {} 사용 불가, 대체 포트 {} 사용", base_port, port);
                    }
                    info!("로컬 API 서버 시작: http://{}", addr);

                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            loop {
                                if *shutdown_rx.borrow() {
                                    info!("웹 서버 종료 신호 수신");
                                    break;
                                }
                                if shutdown_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        })
                        .await?;

                    info!("로컬 API 서버 종료");
                    return Ok(());
                }
                Err(e) => {
                    // AddrInUse 에러인 경우 다음 포트 시도
                    if e.kind() == std::io::ErrorKind::AddrInUse {
                        warn!("포트 {} 이미 사용 중, 다음 포트 시도...", port);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}
