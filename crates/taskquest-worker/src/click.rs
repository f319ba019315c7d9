//! 알림 클릭 라우팅.
//!
//! 클릭 시 앱 오리진에 속한 기존 창이 있으면 첫 번째 창에 포커스하고,
//! 없으면 앱 루트(`/`)를 새 창으로 연다.

use taskquest_core::error::CoreError;
use taskquest_core::ports::window::{WindowClient, WindowClients};
use tracing::{debug, warn};
use url::Url;

/// 새 창으로 여는 경로
pub const APP_ROOT_PATH: &str = "/";

/// 클릭 처리 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// 기존 창 포커스 (클라이언트 ID)
    Focused(String),
    /// 새 창 열기
    Opened,
}

/// 창 URL이 앱 오리진에 속하는지 확인
///
/// 스킴/호스트/포트를 비교한다. 파싱할 수 없는 URL은 제외.
pub fn is_same_origin(window_url: &str, app_origin: &Url) -> bool {
    match Url::parse(window_url) {
        Ok(url) => url.origin() == app_origin.origin(),
        Err(_) => false,
    }
}

/// 알림 클릭 처리
///
/// 포커스가 실패하면(창이 그 사이 닫힘 등) 새 창 열기로 대체한다.
pub async fn handle_click(
    clients: &dyn WindowClients,
    app_origin: &str,
) -> Result<ClickOutcome, CoreError> {
    let origin = Url::parse(app_origin)
        .map_err(|e| CoreError::Config(format!("잘못된 앱 오리진 '{app_origin}': {e}")))?;

    let windows = clients.list_windows().await?;
    let target: Option<&WindowClient> = windows.iter().find(|w| is_same_origin(&w.url, &origin));

    if let Some(window) = target {
        match clients.focus(&window.id).await {
            Ok(()) => {
                debug!("기존 창 포커스: {}", window.id);
                return Ok(ClickOutcome::Focused(window.id.clone()));
            }
            Err(e) => warn!("창 포커스 실패, 새 창으로 대체: {e}"),
        }
    }

    clients.open_window(APP_ROOT_PATH).await?;
    debug!("새 창 열기: {APP_ROOT_PATH}");
    Ok(ClickOutcome::Opened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    const ORIGIN: &str = "http://localhost:5173";

    #[derive(Default)]
    struct MockWindows {
        windows: Vec<WindowClient>,
        broken: Vec<String>,
        focused: Mutex<Vec<String>>,
        opened: Mutex<Vec<String>>,
    }

    impl MockWindows {
        fn with(urls: &[(&str, &str)]) -> Self {
            Self {
                windows: urls
                    .iter()
                    .map(|(id, url)| WindowClient {
                        id: id.to_string(),
                        url: url.to_string(),
                    })
                    .collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl WindowClients for MockWindows {
        async fn list_windows(&self) -> Result<Vec<WindowClient>, CoreError> {
            Ok(self.windows.clone())
        }

        async fn focus(&self, client_id: &str) -> Result<(), CoreError> {
            if self.broken.iter().any(|id| id == client_id) {
                return Err(CoreError::NotFound {
                    resource_type: "window".to_string(),
                    id: client_id.to_string(),
                });
            }
            self.focused.lock().push(client_id.to_string());
            Ok(())
        }

        async fn open_window(&self, path: &str) -> Result<(), CoreError> {
            self.opened.lock().push(path.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn focuses_first_matching_window() {
        let clients = MockWindows::with(&[
            ("other", "https://example.com/"),
            ("w1", "http://localhost:5173/tasks"),
            ("w2", "http://localhost:5173/"),
        ]);

        let outcome = handle_click(&clients, ORIGIN).await.unwrap();

        assert_eq!(outcome, ClickOutcome::Focused("w1".to_string()));
        assert_eq!(*clients.focused.lock(), vec!["w1".to_string()]);
        assert!(clients.opened.lock().is_empty());
    }

    #[tokio::test]
    async fn opens_root_without_matching_window() {
        let clients = MockWindows::with(&[("other", "http://localhost:8080/")]);

        let outcome = handle_click(&clients, ORIGIN).await.unwrap();

        assert_eq!(outcome, ClickOutcome::Opened);
        assert_eq!(*clients.opened.lock(), vec!["/".to_string()]);
    }

    #[tokio::test]
    async fn falls_back_to_open_when_focus_fails() {
        let mut clients = MockWindows::with(&[("w1", "http://localhost:5173/")]);
        clients.broken.push("w1".to_string());

        let outcome = handle_click(&clients, ORIGIN).await.unwrap();

        assert_eq!(outcome, ClickOutcome::Opened);
        assert_eq!(clients.opened.lock().len(), 1);
    }

    #[tokio::test]
    async fn invalid_origin_is_config_error() {
        let clients = MockWindows::default();
        let result = handle_click(&clients, "not a url").await;
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn origin_matching() {
        let origin = Url::parse(ORIGIN).unwrap();
        assert!(is_same_origin("http://localhost:5173/a?b=1#c", &origin));
        assert!(!is_same_origin("http://localhost:51730/", &origin));
        assert!(!is_same_origin("https://localhost:5173/", &origin));
        assert!(!is_same_origin("garbage", &origin));
    }
}
