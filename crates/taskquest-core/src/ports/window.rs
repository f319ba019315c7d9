//! 앱 창(클라이언트) 포트.
//!
//! 알림 클릭 시 기존 창을 포커스하거나 새 창을 연다.
//! 구현: `taskquest-app` BrowserWindows (`taskquest-web` SSE 창 레지스트리 + 시스템 브라우저)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 연결된 앱 창
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowClient {
    /// 클라이언트 ID
    pub id: String,
    /// 창이 보고한 현재 URL
    pub url: String,
}

/// 앱 창 제어 인터페이스
#[async_trait]
pub trait WindowClients: Send + Sync {
    /// 현재 열린 창 목록
    async fn list_windows(&self) -> Result<Vec<WindowClient>, CoreError>;

    /// 창 포커스
    async fn focus(&self, client_id: &str) -> Result<(), CoreError>;

    /// 새 창 열기 (앱 origin 기준 상대 경로)
    async fn open_window(&self, path: &str) -> Result<(), CoreError>;
}
