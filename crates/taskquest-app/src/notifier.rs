//! 데스크톱 알림 어댑터.
//!
//! `SystemNotifier` 포트 구현. notify-rust 기반.
//! XDG 데스크톱(Linux/BSD)에서는 알림 클릭을 감지해 채널로 전달하고,
//! 같은 태그의 알림은 이전 알림을 교체한다.

use async_trait::async_trait;
use notify_rust::Notification;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use taskquest_core::error::CoreError;
use taskquest_core::models::notification::NotificationPayload;
use taskquest_core::ports::notifier::SystemNotifier;
use tokio::sync::mpsc;
use tracing::debug;

/// 알림에 표시할 앱 이름
pub const APP_NAME: &str = "Task Quest";

/// 알림 클릭 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationClick {
    /// 클릭된 알림 태그
    pub tag: String,
}

/// 태그별로 표시 중인 알림
#[derive(Debug)]
struct ShownNotification {
    id: u32,
    /// 클릭 대기 스레드 동작 여부
    waiting: Arc<AtomicBool>,
}

/// 태그 → 마지막 알림 ID 및 클릭 대기 상태
#[derive(Debug, Default)]
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
struct ShownTags {
    tags: Mutex<HashMap<String, ShownNotification>>,
}

#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
impl ShownTags {
    /// 같은 태그로 교체할 알림 ID
    fn replace_id(&self, tag: &str) -> Option<u32> {
        self.tags.lock().get(tag).map(|shown| shown.id)
    }

    /// 표시된 알림 기록
    ///
    /// 같은 ID를 기다리는 스레드가 살아 있으면 `None`, 새 대기 스레드가
    /// 필요하면 그 스레드가 종료 시 내릴 플래그를 반환한다.
    fn record(&self, tag: &str, id: u32) -> Option<Arc<AtomicBool>> {
        let mut tags = self.tags.lock();
        if let Some(shown) = tags.get(tag) {
            if shown.id == id && shown.waiting.load(Ordering::Acquire) {
                return None;
            }
        }

        let waiting = Arc::new(AtomicBool::new(true));
        tags.insert(
            tag.to_string(),
            ShownNotification {
                id,
                waiting: Arc::clone(&waiting),
            },
        );
        Some(waiting)
    }
}

/// 데스크톱 알림 어댑터: `SystemNotifier` 포트 구현
pub struct DesktopNotifier {
    click_tx: Option<mpsc::UnboundedSender<NotificationClick>>,
    shown: ShownTags,
}

impl DesktopNotifier {
    /// 새 알림 어댑터 생성
    pub fn new() -> Self {
        Self {
            click_tx: None,
            shown: ShownTags::default(),
        }
    }

    /// 클릭 이벤트 전달 채널 설정
    pub fn with_click_channel(mut self, tx: mpsc::UnboundedSender<NotificationClick>) -> Self {
        self.click_tx = Some(tx);
        self
    }

    /// 페이로드 → notify-rust 알림
    fn build(payload: &NotificationPayload) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(&payload.title)
            .body(&payload.body)
            .appname(APP_NAME);

        // 웹 경로("/icons/...")는 로컬 파일이 아니므로 실제 파일일 때만 사용
        if Path::new(&payload.icon).is_file() {
            notification.icon(&payload.icon);
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            notification.action("default", "Open");
            if payload.require_interaction {
                notification.timeout(notify_rust::Timeout::Never);
            }
        }

        notification
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SystemNotifier for DesktopNotifier {
    async fn show_notification(&self, payload: &NotificationPayload) -> Result<(), CoreError> {
        debug!("알림: {} [{}]", payload.title, payload.data.notification_type);

        #[allow(unused_mut)]
        let mut notification = Self::build(payload);

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            if let Some(id) = self.shown.replace_id(&payload.tag) {
                notification.id(id);
            }
        }

        let handle = notification
            .show()
            .map_err(|e| CoreError::Notification(format!("알림 표시 실패: {e}")))?;

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let waiting = self.shown.record(&payload.tag, handle.id());
            if let (Some(tx), Some(waiting)) = (self.click_tx.clone(), waiting) {
                let tag = payload.tag.clone();
                // wait_for_action은 알림이 닫힐 때까지 블로킹
                std::thread::spawn(move || {
                    handle.wait_for_action(|action| {
                        if action == "default" {
                            let _ = tx.send(NotificationClick { tag });
                        }
                    });
                    waiting.store(false, Ordering::Release);
                });
            }
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            let _ = (handle, &self.click_tx, &self.shown);
        }

        Ok(())
    }
}
