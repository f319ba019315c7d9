//! 알림 모델.
//!
//! 콘텐츠 전략 종류, 로케일, OS 알림으로 넘기는 페이로드.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 주기 알림 태그: 같은 태그의 알림은 OS에서 서로 대체된다
pub const PERIODIC_NOTIFICATION_TAG: &str = "periodic-notification-bg";

/// 알림 데이터 `type` 필드 값
pub const PERIODIC_DATA_TYPE: &str = "periodic";

/// 알림 언어
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// 아랍어
    Ar,
    /// 영어
    #[default]
    En,
}

impl Locale {
    /// 언어 태그에서 로케일 감지
    ///
    /// `ar`, `ar-SA`, `ar_EG.UTF-8` 등 `ar`로 시작하는 태그는 아랍어,
    /// 그 외 또는 감지 실패 시 영어.
    pub fn detect(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return Self::En;
        };
        let primary = tag
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if primary == "ar" {
            Self::Ar
        } else {
            Self::En
        }
    }

    pub fn is_arabic(self) -> bool {
        self == Self::Ar
    }
}

/// 알림 콘텐츠 전략
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// 고정 동기부여 문구
    Motivational,
    /// 완료/남은/긴급 태스크 통계
    Stats,
    /// 임박한 마감 리마인더
    Reminders,
}

impl ContentKind {
    /// 시간 버킷 순서 (버킷 0, 1, 2)
    pub const ROTATION: [ContentKind; 3] = [
        ContentKind::Motivational,
        ContentKind::Stats,
        ContentKind::Reminders,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Motivational => "motivational",
            ContentKind::Stats => "stats",
            ContentKind::Reminders => "reminders",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 생성된 알림 콘텐츠 (저장되지 않음)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

/// 알림 부가 데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    /// 항상 `"periodic"`
    #[serde(rename = "type")]
    pub data_type: String,
    /// 콘텐츠 전략
    pub notification_type: ContentKind,
}

/// OS 알림 API로 전달되는 페이로드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    /// 아이콘 경로
    pub icon: String,
    /// 배지 경로
    pub badge: String,
    /// 대체 태그
    pub tag: String,
    /// 사용자 상호작용 전까지 유지 여부
    pub require_interaction: bool,
    /// 무음 여부
    pub silent: bool,
    pub data: NotificationData,
}

impl NotificationPayload {
    /// 주기 알림 페이로드 생성
    pub fn periodic(
        content: NotificationContent,
        kind: ContentKind,
        icon: impl Into<String>,
        badge: impl Into<String>,
    ) -> Self {
        Self {
            title: content.title,
            body: content.body,
            icon: icon.into(),
            badge: badge.into(),
            tag: PERIODIC_NOTIFICATION_TAG.to_string(),
            require_interaction: false,
            silent: false,
            data: NotificationData {
                data_type: PERIODIC_DATA_TYPE.to_string(),
                notification_type: kind,
            },
        }
    }
}
