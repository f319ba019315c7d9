//! 캐시 응답 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 캐시에 저장되거나 네트워크에서 받은 자산 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// 요청 URL (origin 제외 경로, 예: "/index.html")
    pub url: String,
    /// HTTP 상태 코드
    pub status: u16,
    /// Content-Type 헤더 값
    pub content_type: Option<String>,
    /// 응답 본문
    pub body: Vec<u8>,
    /// 캐시 저장(또는 수신) 시각
    pub cached_at: DateTime<Utc>,
}

impl CachedResponse {
    /// 현재 시각 기준 응답 생성
    pub fn new(
        url: impl Into<String>,
        status: u16,
        content_type: Option<String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            content_type,
            body,
            cached_at: Utc::now(),
        }
    }

    /// 2xx 응답 여부
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
