//! 알림 미리보기/클릭 핸들러.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Local, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use taskquest_core::models::notification::NotificationPayload;
use taskquest_worker::click::{self, ClickOutcome};

use crate::error::ApiError;
use crate::AppState;

/// 미리보기 쿼리
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// 미리볼 시간 (0-23, 기본: 현재 시각)
    pub hour: Option<u32>,
}

/// GET /api/notifications/preview
///
/// 현재 스냅샷으로 지금(또는 지정 시간에) 발송될 알림 페이로드. 실제로 발송하지 않는다.
pub async fn get_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<NotificationPayload>, ApiError> {
    let now = Local::now().naive_local();
    let at = match query.hour {
        None => now,
        Some(hour) => {
            let time = NaiveTime::from_hms_opt(hour, 0, 0)
                .ok_or_else(|| ApiError::BadRequest(format!("잘못된 시간: {hour}")))?;
            NaiveDateTime::new(now.date(), time)
        }
    };

    Ok(Json(state.scheduler.preview(at)))
}

/// 클릭 처리 응답
#[derive(Debug, Serialize)]
pub struct ClickResponse {
    /// "focused" | "opened"
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// POST /api/notifications/click
///
/// 기존 앱 창이 있으면 포커스, 없으면 새 창을 연다.
pub async fn post_click(State(state): State<AppState>) -> Result<Json<ClickResponse>, ApiError> {
    let outcome = click::handle_click(state.windows.as_ref(), &state.app_origin).await?;

    Ok(Json(match outcome {
        ClickOutcome::Focused(id) => ClickResponse {
            outcome: "focused",
            client_id: Some(id),
        },
        ClickOutcome::Opened => ClickResponse {
            outcome: "opened",
            client_id: None,
        },
    }))
}
