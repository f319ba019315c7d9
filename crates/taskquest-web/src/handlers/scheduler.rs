//! 스케줄러 상태 조회 핸들러.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use taskquest_core::models::notification::Locale;
use taskquest_worker::scheduler::{SchedulerStatus, NOTIFICATION_PERIOD, WARMUP_DELAY};

use crate::AppState;

/// 스케줄러 상태 응답
#[derive(Debug, Serialize)]
pub struct SchedulerStatusResponse {
    #[serde(flatten)]
    pub status: SchedulerStatus,
    pub locale: Locale,
    /// 알림 주기 (초)
    pub period_secs: u64,
    /// 첫 알림 지연 (초)
    pub warmup_secs: u64,
}

/// GET /api/scheduler
pub async fn get_status(State(state): State<AppState>) -> Json<SchedulerStatusResponse> {
    Json(SchedulerStatusResponse {
        status: state.scheduler.status(),
        locale: state.scheduler.locale(),
        period_secs: NOTIFICATION_PERIOD.as_secs(),
        warmup_secs: WARMUP_DELAY.as_secs(),
    })
}
