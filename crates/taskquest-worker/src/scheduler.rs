//! 주기 알림 스케줄러.
//!
//! 활성화되면 5초 뒤 첫 알림, 이후 2시간마다 알림을 발송한다.
//! 상태(활성 플래그, 마지막 스냅샷, 타이머 핸들)는 스케줄러 인스턴스 하나가 소유한다.
//!
//! 상태 전이: Disabled → (start) → Armed → (타이머, 플래그 true) → Notifying → Armed → … → (stop) → Disabled

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use taskquest_core::config::NotificationConfig;
use taskquest_core::models::notification::{Locale, NotificationPayload};
use taskquest_core::models::task::TaskSnapshot;
use taskquest_core::ports::notifier::SystemNotifier;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::content;

/// 반복 알림 주기 (2시간)
pub const NOTIFICATION_PERIOD: Duration = Duration::from_secs(2 * 60 * 60);

/// 활성화 직후 첫 알림까지의 지연
pub const WARMUP_DELAY: Duration = Duration::from_secs(5);

/// 알림 아이콘/배지 경로
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAssets {
    pub icon: String,
    pub badge: String,
}

impl From<&NotificationConfig> for NotificationAssets {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            icon: config.icon.clone(),
            badge: config.badge.clone(),
        }
    }
}

impl Default for NotificationAssets {
    fn default() -> Self {
        Self::from(&NotificationConfig::default())
    }
}

/// 스케줄러 상태
#[derive(Debug, Default)]
struct SchedulerState {
    /// 발송 시점마다 확인하는 활성 플래그
    enabled: bool,
    /// 포그라운드가 마지막으로 보낸 스냅샷
    last_snapshot: TaskSnapshot,
    /// 활성 타이머 (최대 1개)
    timer: Option<JoinHandle<()>>,
    /// 발송 시도 횟수
    fired: u64,
}

/// 스케줄러 상태 조회 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    /// 주기 알림 활성 여부
    pub enabled: bool,
    /// 타이머가 걸려 있는지
    pub armed: bool,
    /// 현재 스냅샷의 태스크 수
    pub task_count: usize,
    /// 지금까지의 발송 시도 횟수
    pub fired: u64,
}

struct SchedulerInner {
    state: Mutex<SchedulerState>,
    notifier: Arc<dyn SystemNotifier>,
    locale: Locale,
    assets: NotificationAssets,
}

impl SchedulerInner {
    fn build_payload(&self, now: NaiveDateTime, snapshot: &TaskSnapshot) -> NotificationPayload {
        let (kind, content) = content::generate(now, snapshot, self.locale);
        NotificationPayload::periodic(
            content,
            kind,
            self.assets.icon.clone(),
            self.assets.badge.clone(),
        )
    }

    /// 한 번의 타이머 발송. 플래그가 꺼져 있으면 아무것도 하지 않는다.
    ///
    /// 알림 호출은 별도 태스크로 넘기므로 타이머가 해제되어도
    /// 이미 시작된 알림은 끝까지 진행된다.
    fn fire(&self) {
        let snapshot = {
            let mut state = self.state.lock();
            if !state.enabled {
                debug!("주기 알림 비활성 상태, 발송 건너뜀");
                return;
            }
            state.fired += 1;
            state.last_snapshot.clone()
        };

        let payload = self.build_payload(Local::now().naive_local(), &snapshot);
        let notifier = Arc::clone(&self.notifier);
        let task_count = snapshot.len();
        tokio::spawn(async move {
            match notifier.show_notification(&payload).await {
                Ok(()) => info!(
                    "주기 알림 발송: {} ({}개 태스크)",
                    payload.data.notification_type, task_count
                ),
                Err(e) => debug!("주기 알림 표시 실패: {e}"),
            }
        });
    }
}

/// 주기 알림 스케줄러
pub struct NotificationScheduler {
    inner: Arc<SchedulerInner>,
}

impl NotificationScheduler {
    /// 비활성 상태의 새 스케줄러 생성
    pub fn new(
        notifier: Arc<dyn SystemNotifier>,
        locale: Locale,
        assets: NotificationAssets,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                state: Mutex::new(SchedulerState::default()),
                notifier,
                locale,
                assets,
            }),
        }
    }

    /// 주기 알림 시작
    ///
    /// 활성 플래그를 켜고 스냅샷을 교체한 뒤, 기존 타이머를 해제하고
    /// 5초 워밍업 + 2시간 반복 타이머를 새로 건다. tokio 런타임 안에서 호출해야 한다.
    pub fn start(&self, tasks: TaskSnapshot) {
        let mut state = self.inner.state.lock();

        if let Some(previous) = state.timer.take() {
            previous.abort();
            debug!("기존 알림 타이머 해제");
        }

        state.enabled = true;
        state.last_snapshot = tasks;

        let armed_at = Instant::now();
        let inner = Arc::downgrade(&self.inner);
        state.timer = Some(tokio::spawn(run_timer(inner, armed_at)));

        info!(
            "주기 알림 시작: 첫 알림 {}초 후, 이후 {}분 주기 ({}개 태스크)",
            WARMUP_DELAY.as_secs(),
            NOTIFICATION_PERIOD.as_secs() / 60,
            state.last_snapshot.len()
        );
    }

    /// 주기 알림 중지 (여러 번 호출해도 안전)
    pub fn stop(&self) {
        let mut state = self.inner.state.lock();
        state.enabled = false;
        match state.timer.take() {
            Some(timer) => {
                timer.abort();
                info!("주기 알림 중지");
            }
            None => debug!("주기 알림이 이미 중지됨"),
        }
    }

    /// 스냅샷만 교체 (타이머는 그대로)
    pub fn update_snapshot(&self, tasks: TaskSnapshot) {
        let mut state = self.inner.state.lock();
        debug!(
            "태스크 스냅샷 갱신: {} → {}개",
            state.last_snapshot.len(),
            tasks.len()
        );
        state.last_snapshot = tasks;
    }

    /// 현재 상태 조회
    pub fn status(&self) -> SchedulerStatus {
        let state = self.inner.state.lock();
        SchedulerStatus {
            enabled: state.enabled,
            armed: state.timer.as_ref().is_some_and(|t| !t.is_finished()),
            task_count: state.last_snapshot.len(),
            fired: state.fired,
        }
    }

    /// 현재 스냅샷 복제본
    pub fn snapshot(&self) -> TaskSnapshot {
        self.inner.state.lock().last_snapshot.clone()
    }

    /// 지정 시각에 발송될 알림 페이로드 (발송하지 않음)
    pub fn preview(&self, now: NaiveDateTime) -> NotificationPayload {
        let snapshot = self.snapshot();
        self.inner.build_payload(now, &snapshot)
    }

    pub fn locale(&self) -> Locale {
        self.inner.locale
    }
}

impl Drop for NotificationScheduler {
    fn drop(&mut self) {
        if let Some(timer) = self.inner.state.lock().timer.take() {
            timer.abort();
        }
    }
}

/// 타이머 태스크: 워밍업 1회 발송 후 고정 주기 반복 발송
async fn run_timer(inner: Weak<SchedulerInner>, armed_at: Instant) {
    tokio::time::sleep_until(armed_at + WARMUP_DELAY).await;
    if !fire_if_alive(&inner) {
        return;
    }

    let mut interval =
        tokio::time::interval_at(armed_at + NOTIFICATION_PERIOD, NOTIFICATION_PERIOD);
    loop {
        interval.tick().await;
        if !fire_if_alive(&inner) {
            return;
        }
    }
}

/// 스케줄러가 살아 있으면 발송하고 true, 이미 해제됐으면 false
fn fire_if_alive(inner: &Weak<SchedulerInner>) -> bool {
    match inner.upgrade() {
        Some(inner) => {
            inner.fire();
            true
        }
        None => false,
    }
}
