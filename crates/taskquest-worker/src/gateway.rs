//! 워커 메시지 게이트웨이.
//!
//! 포그라운드 앱의 제어 메시지를 도착 순서대로 하나씩 처리해 스케줄러 상태를 바꾼다.
//! 여러 생산자(HTTP 핸들러 등)는 [`GatewayHandle`]로 mpsc 채널에 넣고,
//! 단일 소비자 루프가 직렬로 적용한다.

use std::sync::Arc;
use taskquest_core::error::CoreError;
use taskquest_core::models::message::WorkerMessage;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::scheduler::NotificationScheduler;

/// 메시지 채널 용량
const MESSAGE_CHANNEL_CAPACITY: usize = 64;

/// 메시지 게이트웨이
pub struct MessageGateway {
    scheduler: Arc<NotificationScheduler>,
}

impl MessageGateway {
    pub fn new(scheduler: Arc<NotificationScheduler>) -> Self {
        Self { scheduler }
    }

    /// 메시지 하나를 즉시 적용
    pub fn handle(&self, message: WorkerMessage) {
        debug!("워커 메시지 수신: {}", message.type_name());
        match message {
            WorkerMessage::StartPeriodicNotifications { tasks } => {
                self.scheduler.start(tasks);
            }
            WorkerMessage::StopPeriodicNotifications => {
                self.scheduler.stop();
            }
            WorkerMessage::UpdateTasksData { tasks } => {
                self.scheduler.update_snapshot(tasks);
            }
        }
    }

    /// 단일 소비자 루프 시작
    ///
    /// 모든 핸들이 drop되거나 종료 신호를 받으면 루프가 끝난다.
    pub fn spawn(self, mut shutdown_rx: watch::Receiver<bool>) -> (GatewayHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<WorkerMessage>(MESSAGE_CHANNEL_CAPACITY);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    message = rx.recv() => {
                        match message {
                            Some(message) => self.handle(message),
                            None => {
                                debug!("메시지 채널 닫힘");
                                break;
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        info!("메시지 게이트웨이 종료");
                        break;
                    }
                }
            }
        });

        (GatewayHandle { tx }, task)
    }
}

/// 게이트웨이로 메시지를 보내는 핸들
#[derive(Debug, Clone)]
pub struct GatewayHandle {
    tx: mpsc::Sender<WorkerMessage>,
}

impl GatewayHandle {
    /// 메시지 전송 (채널이 가득 차면 대기)
    pub async fn send(&self, message: WorkerMessage) -> Result<(), CoreError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| CoreError::Internal("메시지 게이트웨이가 종료됨".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::NotificationAssets;
    use async_trait::async_trait;
    use taskquest_core::models::notification::{Locale, NotificationPayload};
    use taskquest_core::models::task::{TaskRecord, TaskSnapshot};
    use taskquest_core::ports::notifier::SystemNotifier;

    struct SilentNotifier;

    #[async_trait]
    impl SystemNotifier for SilentNotifier {
        async fn show_notification(&self, _payload: &NotificationPayload) -> Result<(), CoreError> {
            Ok(())
        }
    }

    fn scheduler() -> Arc<NotificationScheduler> {
        Arc::new(NotificationScheduler::new(
            Arc::new(SilentNotifier),
            Locale::En,
            NotificationAssets::default(),
        ))
    }

    fn tasks(titles: &[&str]) -> TaskSnapshot {
        TaskSnapshot::new(titles.iter().map(|t| TaskRecord::new(*t)).collect())
    }

    #[tokio::test]
    async fn start_enables_and_arms() {
        let scheduler = scheduler();
        let gateway = MessageGateway::new(scheduler.clone());

        gateway.handle(WorkerMessage::StartPeriodicNotifications {
            tasks: tasks(&["a", "b"]),
        });

        let status = scheduler.status();
        assert!(status.enabled);
        assert!(status.armed);
        assert_eq!(status.task_count, 2);
    }

    #[tokio::test]
    async fn update_replaces_snapshot_only() {
        let scheduler = scheduler();
        let gateway = MessageGateway::new(scheduler.clone());

        gateway.handle(WorkerMessage::UpdateTasksData {
            tasks: tasks(&["a"]),
        });

        let status = scheduler.status();
        assert!(!status.enabled);
        assert!(!status.armed);
        assert_eq!(scheduler.snapshot(), tasks(&["a"]));
    }

    #[tokio::test]
    async fn stop_disables() {
        let scheduler = scheduler();
        let gateway = MessageGateway::new(scheduler.clone());

        gateway.handle(WorkerMessage::StartPeriodicNotifications {
            tasks: tasks(&["a"]),
        });
        gateway.handle(WorkerMessage::StopPeriodicNotifications);

        let status = scheduler.status();
        assert!(!status.enabled);
        assert!(!status.armed);
        // 스냅샷은 유지
        assert_eq!(status.task_count, 1);
    }

    #[tokio::test]
    async fn channel_preserves_arrival_order() {
        let scheduler = scheduler();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (handle, task) = MessageGateway::new(scheduler.clone()).spawn(shutdown_rx);

        handle
            .send(WorkerMessage::StartPeriodicNotifications {
                tasks: tasks(&["a"]),
            })
            .await
            .unwrap();
        handle
            .send(WorkerMessage::UpdateTasksData {
                tasks: tasks(&["a", "b", "c"]),
            })
            .await
            .unwrap();
        handle
            .send(WorkerMessage::StopPeriodicNotifications)
            .await
            .unwrap();

        // 핸들을 모두 drop하면 루프가 남은 메시지를 처리하고 종료
        drop(handle);
        task.await.unwrap();

        let status = scheduler.status();
        assert!(!status.enabled);
        assert_eq!(status.task_count, 3);
    }

    #[tokio::test]
    async fn send_after_shutdown_fails() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (handle, task) = MessageGateway::new(scheduler()).spawn(shutdown_rx);

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();

        let result = handle.send(WorkerMessage::StopPeriodicNotifications).await;
        assert!(matches!(result, Err(CoreError::Internal(_))));
    }
}
