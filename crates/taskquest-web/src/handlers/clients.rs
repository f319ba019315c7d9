//! 앱 창 SSE 등록 핸들러.

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use taskquest_core::ports::window::WindowClient;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

use crate::registry::Registration;
use crate::AppState;

/// 스트림 등록 쿼리
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// 창의 현재 URL
    pub url: String,
}

/// GET /api/clients/stream?url=...
///
/// 스트림이 열려 있는 동안 창이 레지스트리에 등록된다.
/// 첫 이벤트 `registered`에 클라이언트 ID가 담기고, 이후 `focus` 이벤트를 받는다.
pub async fn client_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, rx) = state.clients.register(query.url);
    let registration = Registration::new(state.clients.clone(), id.clone());

    let registered = tokio_stream::once(Ok(Event::default()
        .event("registered")
        .data(serde_json::json!({ "id": id }).to_string())));

    let events = UnboundedReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(Event::default().event(event.name()).data(data))
    });

    Sse::new(registration.attach(registered.chain(events))).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// GET /api/clients
pub async fn list_clients(State(state): State<AppState>) -> Json<Vec<WindowClient>> {
    Json(state.clients.list())
}
