//! 태스크 스냅샷 모델.
//!
//! 포그라운드 앱이 워커로 넘기는 시점 고정 태스크 목록.
//! 역직렬화는 관대하게 동작한다: 타입이 맞지 않거나 누락된 필드는 기본값으로,
//! 배열이 아닌 `tasks`는 빈 스냅샷으로 처리한다.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 태스크 우선순위
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// 문자열에서 우선순위 파싱 (대소문자 무시, 알 수 없으면 None)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// 단일 태스크 레코드
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// 태스크 제목
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    /// 완료 여부
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub completed: bool,
    /// 우선순위 (없거나 알 수 없는 값이면 None)
    #[serde(
        default,
        deserialize_with = "lenient::priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<TaskPriority>,
    /// 마감일 원문 (YYYY-MM-DD 또는 RFC 3339)
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<String>,
}

impl TaskRecord {
    /// 제목만 가진 미완료 태스크 생성
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// 마감일을 로컬 날짜로 해석
    ///
    /// 날짜만 있는 형식, RFC 3339, 타임존 없는 날짜-시각을 지원한다.
    /// 해석할 수 없으면 None.
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        let raw = self.deadline.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Local).date_naive());
        }

        const NAIVE_FORMATS: [&str; 4] = [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
        ];
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|dt| dt.date())
    }

    /// 긴급 미완료 태스크 여부
    pub fn is_urgent_incomplete(&self) -> bool {
        !self.completed && self.priority == Some(TaskPriority::Urgent)
    }
}

/// 태스크 스냅샷: 순서가 보존되는 태스크 목록의 시점 복사본
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskSnapshot(Vec<TaskRecord>);

impl TaskSnapshot {
    /// 태스크 목록으로 스냅샷 생성
    pub fn new(tasks: Vec<TaskRecord>) -> Self {
        Self(tasks)
    }

    /// 태스크 슬라이스
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 완료된 태스크 수
    pub fn completed_count(&self) -> usize {
        self.0.iter().filter(|t| t.completed).count()
    }

    /// 남은(미완료) 태스크 수
    pub fn remaining_count(&self) -> usize {
        self.0.iter().filter(|t| !t.completed).count()
    }

    /// 긴급 + 미완료 태스크 수
    pub fn urgent_incomplete_count(&self) -> usize {
        self.0.iter().filter(|t| t.is_urgent_incomplete()).count()
    }

    /// 마감이 [today, 내일] 구간인 미완료 태스크 (스냅샷 순서 유지)
    ///
    /// 마감일이 없거나 해석 불가한 태스크는 제외된다.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&TaskRecord> {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        self.0
            .iter()
            .filter(|t| !t.completed)
            .filter(|t| {
                t.deadline_date()
                    .is_some_and(|d| d >= today && d <= tomorrow)
            })
            .collect()
    }
}

impl From<Vec<TaskRecord>> for TaskSnapshot {
    fn from(tasks: Vec<TaskRecord>) -> Self {
        Self(tasks)
    }
}

impl<'de> Deserialize<'de> for TaskSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

impl TaskSnapshot {
    /// 임의 JSON 값에서 스냅샷 생성 (배열이 아니면 빈 스냅샷, 객체가 아닌 원소는 건너뜀)
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self(
                items
                    .into_iter()
                    .filter(Value::is_object)
                    .filter_map(|item| serde_json::from_value::<TaskRecord>(item).ok())
                    .collect(),
            ),
            _ => Self::default(),
        }
    }
}

/// 관대한 필드 역직렬화 헬퍼
mod lenient {
    use super::TaskPriority;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub(super) fn optional_string<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }

    pub(super) fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(matches!(Value::deserialize(d)?, Value::Bool(true)))
    }

    pub(super) fn priority<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<TaskPriority>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => TaskPriority::parse(&s),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn stats_counts() {
        let snapshot: TaskSnapshot = serde_json::from_value(json!([
            {"completed": true},
            {"completed": false, "priority": "urgent"}
        ]))
        .unwrap();

        assert_eq!(snapshot.completed_count(), 1);
        assert_eq!(snapshot.remaining_count(), 1);
        assert_eq!(snapshot.urgent_incomplete_count(), 1);
    }

    #[test]
    fn malformed_fields_degrade_to_defaults() {
        let snapshot: TaskSnapshot = serde_json::from_value(json!([
            {"title": 42, "completed": "yes", "priority": 3, "deadline": false},
            "not-a-task",
            null,
            {"title": "정상", "completed": true, "priority": "HIGH"}
        ]))
        .unwrap();

        assert_eq!(snapshot.len(), 2);
        let first = &snapshot.tasks()[0];
        assert_eq!(first.title, "42");
        assert!(!first.completed);
        assert_eq!(first.priority, None);
        assert_eq!(first.deadline, None);
        assert_eq!(snapshot.tasks()[1].priority, Some(TaskPriority::High));
    }

    #[test]
    fn non_array_snapshot_is_empty() {
        let snapshot: TaskSnapshot = serde_json::from_value(json!({"tasks": "oops"})).unwrap();
        assert!(snapshot.is_empty());
        let snapshot: TaskSnapshot = serde_json::from_value(json!(null)).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn deadline_formats() {
        let mut task = TaskRecord::new("t");

        task.deadline = Some("2026-10-20".to_string());
        assert_eq!(task.deadline_date(), Some(date("2026-10-20")));

        task.deadline = Some("2026-10-20T09:30".to_string());
        assert_eq!(task.deadline_date(), Some(date("2026-10-20")));

        task.deadline = Some("2026-10-20T09:30:15.250".to_string());
        assert_eq!(task.deadline_date(), Some(date("2026-10-20")));

        task.deadline = Some("next tuesday".to_string());
        assert_eq!(task.deadline_date(), None);
    }

    #[test]
    fn rfc3339_deadline_uses_local_date() {
        let mut task = TaskRecord::new("t");
        let instant = Local::now();
        task.deadline = Some(instant.to_rfc3339());
        assert_eq!(task.deadline_date(), Some(instant.date_naive()));
    }

    #[test]
    fn upcoming_window_is_today_through_tomorrow() {
        let today = date("2026-10-19");
        let snapshot = TaskSnapshot::new(vec![
            TaskRecord {
                title: "어제".to_string(),
                deadline: Some("2026-10-18".to_string()),
                ..Default::default()
            },
            TaskRecord {
                title: "오늘".to_string(),
                deadline: Some("2026-10-19".to_string()),
                ..Default::default()
            },
            TaskRecord {
                title: "내일".to_string(),
                deadline: Some("2026-10-20".to_string()),
                ..Default::default()
            },
            TaskRecord {
                title: "모레".to_string(),
                deadline: Some("2026-10-21".to_string()),
                ..Default::default()
            },
            TaskRecord {
                title: "완료된 내일".to_string(),
                completed: true,
                deadline: Some("2026-10-20".to_string()),
                ..Default::default()
            },
            TaskRecord::new("마감 없음"),
        ]);

        let titles: Vec<&str> = snapshot
            .upcoming(today)
            .into_iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["오늘", "내일"]);
    }
}
