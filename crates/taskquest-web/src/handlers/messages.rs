//! 워커 메시지 수신 핸들러.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use taskquest_core::models::message::WorkerMessage;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// 메시지 접수 응답
#[derive(Debug, Serialize)]
pub struct MessageAccepted {
    pub accepted: bool,
    /// 접수된 메시지 타입
    #[serde(rename = "type")]
    pub message_type: &'static str,
}

/// POST /api/messages
///
/// `{type, data: {tasks}}` 형식의 메시지를 검증한 뒤 게이트웨이 큐에 넣는다.
/// 처리는 비동기이며 도착 순서대로 적용된다.
pub async fn post_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageAccepted>), ApiError> {
    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("JSON 파싱 실패: {e}")))?;
    let message = WorkerMessage::from_value(value)?;
    let message_type = message.type_name();

    state
        .gateway
        .send(message)
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;

    debug!("워커 메시지 접수: {message_type}");
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageAccepted {
            accepted: true,
            message_type,
        }),
    ))
}
