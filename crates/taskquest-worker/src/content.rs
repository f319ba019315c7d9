//! 알림 콘텐츠 생성기.
//!
//! (시간 버킷, 태스크 스냅샷, 로케일) → 알림 제목/본문. 부수효과 없는 순수 함수.
//! 버킷 = floor(hour / 2) mod 3 → 동기부여 / 통계 / 리마인더 순환.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use taskquest_core::models::notification::{ContentKind, Locale, NotificationContent};
use taskquest_core::models::task::TaskSnapshot;

/// 시간(0-23)의 콘텐츠 버킷 인덱스
pub fn bucket(hour: u32) -> usize {
    ((hour / 2) % 3) as usize
}

/// 시간에 해당하는 콘텐츠 전략
pub fn kind_for_hour(hour: u32) -> ContentKind {
    ContentKind::ROTATION[bucket(hour)]
}

/// 현재 시각 기준 알림 콘텐츠 생성
pub fn generate(
    now: NaiveDateTime,
    tasks: &TaskSnapshot,
    locale: Locale,
) -> (ContentKind, NotificationContent) {
    let kind = kind_for_hour(now.hour());
    (kind, render(kind, now.date(), tasks, locale))
}

/// 지정 전략으로 콘텐츠 렌더링
pub fn render(
    kind: ContentKind,
    today: NaiveDate,
    tasks: &TaskSnapshot,
    locale: Locale,
) -> NotificationContent {
    match kind {
        ContentKind::Motivational => motivational(locale),
        ContentKind::Stats => stats(tasks, locale),
        ContentKind::Reminders => reminders(today, tasks, locale),
    }
}

fn motivational(locale: Locale) -> NotificationContent {
    if locale.is_arabic() {
        NotificationContent {
            title: "💪 استمر في التقدم!".to_string(),
            body: "كل مهمة تنجزها تقربك خطوة من هدفك. واصل العمل!".to_string(),
        }
    } else {
        NotificationContent {
            title: "💪 Keep Going!".to_string(),
            body: "Every task you complete brings you one step closer to your goal. Keep it up!"
                .to_string(),
        }
    }
}

fn stats(tasks: &TaskSnapshot, locale: Locale) -> NotificationContent {
    let completed = tasks.completed_count();
    let remaining = tasks.remaining_count();
    let urgent = tasks.urgent_incomplete_count();

    if locale.is_arabic() {
        NotificationContent {
            title: "📊 إحصائيات مهامك".to_string(),
            body: format!("مكتملة: {completed} | متبقية: {remaining} | عاجلة: {urgent}"),
        }
    } else {
        NotificationContent {
            title: "📊 Your Task Stats".to_string(),
            body: format!("Completed: {completed} | Remaining: {remaining} | Urgent: {urgent}"),
        }
    }
}

fn reminders(today: NaiveDate, tasks: &TaskSnapshot, locale: Locale) -> NotificationContent {
    let upcoming = tasks.upcoming(today);

    let Some(first) = upcoming.first() else {
        return if locale.is_arabic() {
            NotificationContent {
                title: "✅ لا توجد مهام عاجلة".to_string(),
                body: "لا توجد مهام مستحقة اليوم أو غداً. أحسنت!".to_string(),
            }
        } else {
            NotificationContent {
                title: "✅ No Urgent Tasks".to_string(),
                body: "Nothing is due today or tomorrow. Great job!".to_string(),
            }
        };
    };

    let count = upcoming.len();
    if locale.is_arabic() {
        NotificationContent {
            title: "⏰ تذكير بالمهام".to_string(),
            body: format!("لديك {count} مهام قريبة الموعد. التالية: {}", first.title),
        }
    } else {
        let noun = if count == 1 { "task" } else { "tasks" };
        NotificationContent {
            title: "⏰ Task Reminder".to_string(),
            body: format!("You have {count} {noun} due soon. Next up: {}", first.title),
        }
    }
}
