//! 앱 창 제어 어댑터.
//!
//! `WindowClients` 포트 구현. 열린 창 목록과 포커스는 SSE 레지스트리에 위임하고,
//! 새 창은 시스템 기본 브라우저로 연다.

use async_trait::async_trait;
use std::process::ExitStatus;
use taskquest_core::error::CoreError;
use taskquest_core::ports::window::{WindowClient, WindowClients};
use taskquest_web::ClientRegistry;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// 브라우저 기반 창 제어: `WindowClients` 포트 구현
pub struct BrowserWindows {
    registry: ClientRegistry,
    app_origin: Url,
}

impl BrowserWindows {
    pub fn new(registry: ClientRegistry, app_origin: &str) -> Result<Self, CoreError> {
        let app_origin = Url::parse(app_origin)
            .map_err(|e| CoreError::Config(format!("잘못된 앱 origin '{app_origin}': {e}")))?;
        Ok(Self {
            registry,
            app_origin,
        })
    }

    /// 앱 origin 기준 절대 URL
    fn resolve(&self, path: &str) -> Result<Url, CoreError> {
        self.app_origin
            .join(path)
            .map_err(|e| CoreError::validation("path", format!("잘못된 경로 '{path}': {e}")))
    }
}

/// 플랫폼 기본 브라우저 실행 명령
fn browser_command(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }

    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// 브라우저 프로세스 실행
///
/// 실행 실패만 즉시 반환한다. 종료 대기는 별도 태스크에서 하며
/// 끝난 프로세스는 그 태스크가 회수한다.
fn launch(mut cmd: Command) -> Result<JoinHandle<Option<ExitStatus>>, CoreError> {
    let mut child = cmd
        .spawn()
        .map_err(|e| CoreError::Internal(format!("브라우저 실행 실패: {e}")))?;

    Ok(tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => {
                debug!("브라우저 실행 명령 종료");
                Some(status)
            }
            Ok(status) => {
                warn!("브라우저 실행 명령 비정상 종료: {status}");
                Some(status)
            }
            Err(e) => {
                warn!("브라우저 프로세스 대기 실패: {e}");
                None
            }
        }
    }))
}

#[async_trait]
impl WindowClients for BrowserWindows {
    async fn list_windows(&self) -> Result<Vec<WindowClient>, CoreError> {
        Ok(self.registry.list())
    }

    async fn focus(&self, client_id: &str) -> Result<(), CoreError> {
        self.registry.focus(client_id)
    }

    async fn open_window(&self, path: &str) -> Result<(), CoreError> {
        let url = self.resolve(path)?;
        info!("브라우저 창 열기: {url}");

        launch(browser_command(url.as_str()))?;
        Ok(())
    }
}
