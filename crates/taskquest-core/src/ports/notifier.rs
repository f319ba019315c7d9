//! 시스템 알림 포트.
//!
//! 구현: `taskquest-app` crate (notify-rust)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::notification::NotificationPayload;

/// OS 알림 인터페이스
#[async_trait]
pub trait SystemNotifier: Send + Sync {
    /// 알림 표시
    async fn show_notification(&self, payload: &NotificationPayload) -> Result<(), CoreError>;
}
