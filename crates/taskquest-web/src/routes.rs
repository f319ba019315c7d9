//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 워커 메시지
        .route("/messages", post(handlers::messages::post_message))
        // 스케줄러 상태
        .route("/scheduler", get(handlers::scheduler::get_status))
        // 알림
        .route(
            "/notifications/preview",
            get(handlers::notifications::get_preview),
        )
        .route(
            "/notifications/click",
            post(handlers::notifications::post_click),
        )
        // 앱 창 (SSE 등록)
        .route("/clients", get(handlers::clients::list_clients))
        .route("/clients/stream", get(handlers::clients::client_stream))
}
