//! 워커 제어 메시지.
//!
//! 포그라운드 앱 → 워커 방향 메시지의 타입 안전 표현.
//! 와이어 형식 `{type, data: {tasks}}`은 [`MessageEnvelope`]로 받고,
//! 경계에서 [`WorkerMessage`]로 검증 변환한다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::models::task::TaskSnapshot;

/// 주기 알림 시작 메시지 타입
pub const START_PERIODIC_NOTIFICATIONS: &str = "START_PERIODIC_NOTIFICATIONS";
/// 주기 알림 중지 메시지 타입
pub const STOP_PERIODIC_NOTIFICATIONS: &str = "STOP_PERIODIC_NOTIFICATIONS";
/// 태스크 스냅샷 갱신 메시지 타입
pub const UPDATE_TASKS_DATA: &str = "UPDATE_TASKS_DATA";

/// 와이어 형식 메시지 봉투 (검증 전)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// 메시지 종류
    #[serde(rename = "type")]
    pub kind: String,
    /// 메시지 데이터 (`{tasks: [...]}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// 검증된 워커 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MessageEnvelope", into = "MessageEnvelope")]
pub enum WorkerMessage {
    /// 주기 알림 활성화 + 스냅샷 교체 + 타이머 재설정
    StartPeriodicNotifications { tasks: TaskSnapshot },
    /// 주기 알림 비활성화 + 타이머 해제
    StopPeriodicNotifications,
    /// 스냅샷만 교체 (타이머 유지)
    UpdateTasksData { tasks: TaskSnapshot },
}

impl WorkerMessage {
    /// JSON 문자열 파싱 + 검증
    pub fn parse(json: &str) -> Result<Self, CoreError> {
        let envelope: MessageEnvelope = serde_json::from_str(json)?;
        Self::try_from(envelope)
    }

    /// JSON 값 파싱 + 검증
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let envelope: MessageEnvelope = serde_json::from_value(value)?;
        Self::try_from(envelope)
    }

    /// 와이어 형식 메시지 타입 이름
    pub fn type_name(&self) -> &'static str {
        match self {
            WorkerMessage::StartPeriodicNotifications { .. } => START_PERIODIC_NOTIFICATIONS,
            WorkerMessage::StopPeriodicNotifications => STOP_PERIODIC_NOTIFICATIONS,
            WorkerMessage::UpdateTasksData { .. } => UPDATE_TASKS_DATA,
        }
    }
}

/// `data.tasks` 추출: 누락되거나 형식이 틀리면 빈 스냅샷
fn extract_tasks(data: Option<Value>) -> TaskSnapshot {
    match data {
        Some(Value::Object(mut map)) => map
            .remove("tasks")
            .map(TaskSnapshot::from_value)
            .unwrap_or_default(),
        _ => TaskSnapshot::default(),
    }
}

impl TryFrom<MessageEnvelope> for WorkerMessage {
    type Error = CoreError;

    fn try_from(envelope: MessageEnvelope) -> Result<Self, Self::Error> {
        match envelope.kind.as_str() {
            START_PERIODIC_NOTIFICATIONS => Ok(WorkerMessage::StartPeriodicNotifications {
                tasks: extract_tasks(envelope.data),
            }),
            STOP_PERIODIC_NOTIFICATIONS => Ok(WorkerMessage::StopPeriodicNotifications),
            UPDATE_TASKS_DATA => Ok(WorkerMessage::UpdateTasksData {
                tasks: extract_tasks(envelope.data),
            }),
            other => Err(CoreError::validation(
                "type",
                format!("알 수 없는 메시지 타입: {other}"),
            )),
        }
    }
}

impl From<WorkerMessage> for MessageEnvelope {
    fn from(message: WorkerMessage) -> Self {
        let kind = message.type_name().to_string();
        let data = match message {
            WorkerMessage::StartPeriodicNotifications { tasks }
            | WorkerMessage::UpdateTasksData { tasks } => {
                Some(serde_json::json!({ "tasks": tasks }))
            }
            WorkerMessage::StopPeriodicNotifications => None,
        };
        Self { kind, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parse_start_message() {
        let msg = WorkerMessage::parse(
            r#"{"type":"START_PERIODIC_NOTIFICATIONS","data":{"tasks":[{"title":"운동","completed":false}]}}"#,
        )
        .unwrap();

        assert_matches!(msg, WorkerMessage::StartPeriodicNotifications { ref tasks } if tasks.len() == 1);
        assert_eq!(msg.type_name(), START_PERIODIC_NOTIFICATIONS);
    }

    #[test]
    fn parse_stop_message_with_or_without_data() {
        let msg = WorkerMessage::parse(r#"{"type":"STOP_PERIODIC_NOTIFICATIONS"}"#).unwrap();
        assert_eq!(msg, WorkerMessage::StopPeriodicNotifications);

        let msg =
            WorkerMessage::parse(r#"{"type":"STOP_PERIODIC_NOTIFICATIONS","data":{"tasks":[]}}"#)
                .unwrap();
        assert_eq!(msg, WorkerMessage::StopPeriodicNotifications);
    }

    #[test]
    fn missing_tasks_become_empty_snapshot() {
        let msg = WorkerMessage::parse(r#"{"type":"UPDATE_TASKS_DATA"}"#).unwrap();
        assert_matches!(msg, WorkerMessage::UpdateTasksData { ref tasks } if tasks.is_empty());

        let msg = WorkerMessage::parse(r#"{"type":"UPDATE_TASKS_DATA","data":"garbage"}"#).unwrap();
        assert_matches!(msg, WorkerMessage::UpdateTasksData { ref tasks } if tasks.is_empty());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = WorkerMessage::parse(r#"{"type":"SELF_DESTRUCT"}"#).unwrap_err();
        assert_matches!(err, CoreError::Validation { ref field, .. } if field == "type");
    }

    #[test]
    fn missing_type_is_rejected() {
        let err = WorkerMessage::parse(r#"{"data":{"tasks":[]}}"#).unwrap_err();
        assert_matches!(err, CoreError::Serialization(_));
    }

    #[test]
    fn serde_derive_goes_through_validation() {
        let result: Result<WorkerMessage, _> = serde_json::from_str(r#"{"type":"NOPE"}"#);
        assert!(result.is_err());

        let stop = serde_json::to_string(&WorkerMessage::StopPeriodicNotifications).unwrap();
        assert_eq!(stop, r#"{"type":"STOP_PERIODIC_NOTIFICATIONS"}"#);
    }
}
