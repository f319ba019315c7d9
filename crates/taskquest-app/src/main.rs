//! # taskquest-app
//!
//! Task Quest 백그라운드 워커 바이너리 진입점.
//! DI 컨테이너 역할, 라이프사이클 관리, 캐시 설치/활성화, 루프 오케스트레이션.

mod browser;
mod lifecycle;
mod notifier;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use taskquest_core::config::{AppConfig, LocaleSetting};
use taskquest_core::config_manager::ConfigManager;
use taskquest_core::models::notification::Locale;
use taskquest_core::models::task::TaskSnapshot;
use taskquest_core::ports::window::WindowClients;
use taskquest_network::http_fetcher::HttpFetcher;
use taskquest_storage::sqlite::SqliteCacheStorage;
use taskquest_web::{AppState, ClientRegistry, WebServer};
use taskquest_worker::cache_manager::CacheManager;
use taskquest_worker::click;
use taskquest_worker::gateway::MessageGateway;
use taskquest_worker::scheduler::{NotificationAssets, NotificationScheduler};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::browser::BrowserWindows;
use crate::lifecycle::LifecycleManager;
use crate::notifier::{DesktopNotifier, NotificationClick};

/// 종료 시 게이트웨이 정리 대기 시간
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Task Quest 백그라운드 워커
///
/// 태스크 스냅샷 기반 주기 알림 + 오프라인 자산 캐시
#[derive(Parser, Debug)]
#[command(name = "taskquest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로컬 API 포트 (기본: 설정 파일 값, 9190)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 데이터 저장 경로 (캐시 DB 위치)
    #[arg(long)]
    data_dir: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 알림 언어 (auto, ar, en)
    #[arg(long, value_parser = ["auto", "ar", "en"])]
    locale: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 포그라운드 메시지 없이 부팅 즉시 주기 알림 시작
    #[arg(long)]
    start: bool,

    /// 부팅 시 사전 캐시 설치 건너뛰기
    #[arg(long)]
    skip_precache: bool,
}

/// 데이터베이스 경로 결정 (CLI 인자 → 설정 파일 → 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/com.taskquest.worker/cache.db`
/// - Windows: `%APPDATA%\taskquest\worker\cache.db`
/// - Linux: `~/.local/share/taskquest/worker/cache.db`
fn resolve_db_path(data_dir: Option<&str>, configured: Option<&Path>) -> PathBuf {
    data_dir
        .map(|d| PathBuf::from(d).join("cache.db"))
        .or_else(|| configured.map(Path::to_path_buf))
        .or_else(|| ConfigManager::default_data_dir().map(|d| d.join("cache.db")))
        .unwrap_or_else(|| PathBuf::from("./cache.db"))
}

/// 시스템 언어 태그 (LC_ALL → LC_MESSAGES → LANG)
fn system_language_tag() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.is_empty())
}

/// CLI 인자로 설정 오버라이드
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(port) = args.port {
        config.web.port = port;
    }
    if let Some(locale) = args.locale.as_deref() {
        config.notification.locale = match locale {
            "ar" => LocaleSetting::Ar,
            "en" => LocaleSetting::En,
            _ => LocaleSetting::Auto,
        };
    }
    if args.start {
        config.notification.start_on_boot = true;
    }
}

/// 설정 관리자 생성 (실패 시 데이터 디렉토리의 설정 파일로 대체)
fn load_config_manager(args: &Args) -> Result<ConfigManager> {
    if let Some(path) = &args.config {
        return Ok(ConfigManager::with_path(path.clone())?);
    }

    match ConfigManager::new() {
        Ok(manager) => Ok(manager),
        Err(e) => {
            warn!("설정 관리자 초기화 실패, 대체 경로 사용: {e}");
            let fallback = PathBuf::from(args.data_dir.as_deref().unwrap_or(".")).join("config.json");
            Ok(ConfigManager::with_path(fallback)?)
        }
    }
}

/// 사전 캐시 설치 후 이전 버전 정리
///
/// 설치가 실패하면 기존 캐시를 그대로 둔다.
async fn prepare_cache(cache: &CacheManager) {
    match cache.install().await {
        Ok(count) => {
            info!("사전 캐시 {count}개 설치: {}", cache.version());
            match cache.activate().await {
                Ok(deleted) if !deleted.is_empty() => {
                    info!("이전 캐시 정리: {}", deleted.join(", "));
                }
                Ok(_) => {}
                Err(e) => warn!("캐시 활성화 실패: {e}"),
            }
        }
        Err(e) => warn!("사전 캐시 설치 실패, 기존 캐시 유지: {e}"),
    }
}

/// 알림 클릭 → 창 포커스/열기 루프
async fn run_click_router(
    mut click_rx: mpsc::UnboundedReceiver<NotificationClick>,
    windows: Arc<dyn WindowClients>,
    app_origin: String,
    mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            click_event = click_rx.recv() => {
                let Some(click_event) = click_event else { break };
                match click::handle_click(windows.as_ref(), &app_origin).await {
                    Ok(outcome) => info!("알림 클릭 처리 ({}): {outcome:?}", click_event.tag),
                    Err(e) => warn!("알림 클릭 처리 실패: {e}"),
                }
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "taskquest={0},taskquest_app={0},taskquest_core={0},taskquest_worker={0},taskquest_storage={0},taskquest_network={0},taskquest_web={0},tower_http={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("Task Quest 워커 시작");

    // 설정 로드
    let config_manager = load_config_manager(&args)?;
    info!("설정 파일: {}", config_manager.config_path().display());
    let mut config = config_manager.into_config();
    apply_overrides(&mut config, &args);

    let language_tag = system_language_tag();
    let locale: Locale = config.notification.locale.resolve(language_tag.as_deref());
    info!("알림 언어: {locale:?} (시스템: {language_tag:?})");

    // ── 어댑터 생성 (DI 와이어링) ──

    // 1. 캐시 저장소 (파일 기반 SQLite)
    let db_path = resolve_db_path(args.data_dir.as_deref(), config.storage.db_path.as_deref());
    let storage = Arc::new(SqliteCacheStorage::open(&db_path)?);
    info!("캐시 저장소: {}", db_path.display());

    // 2. 자산 페처
    let fetcher = Arc::new(HttpFetcher::new(
        &config.cache.asset_origin,
        config.request_timeout(),
    )?);

    // 3. 캐시 매니저
    let cache = Arc::new(CacheManager::new(&config.cache, storage, fetcher));
    if args.skip_precache {
        info!("사전 캐시 설치 건너뜀");
    } else {
        prepare_cache(&cache).await;
    }

    // 4. 데스크톱 알림 + 클릭 채널
    let (click_tx, click_rx) = mpsc::unbounded_channel();
    let notifier = Arc::new(DesktopNotifier::new().with_click_channel(click_tx));

    // 5. 스케줄러 + 게이트웨이
    let scheduler = Arc::new(NotificationScheduler::new(
        notifier,
        locale,
        NotificationAssets::from(&config.notification),
    ));

    let lifecycle = LifecycleManager::new();
    let (gateway, gateway_task) =
        MessageGateway::new(scheduler.clone()).spawn(lifecycle.subscribe());

    if config.notification.start_on_boot {
        info!("부팅 시 주기 알림 시작 (스냅샷은 포그라운드 갱신 대기)");
        scheduler.start(TaskSnapshot::default());
    }

    // 6. 앱 창 레지스트리 + 브라우저 어댑터
    let clients = ClientRegistry::new();
    let windows: Arc<dyn WindowClients> = Arc::new(BrowserWindows::new(
        clients.clone(),
        &config.notification.app_origin,
    )?);

    // ── 태스크 시작 ──

    tokio::spawn(run_click_router(
        click_rx,
        windows.clone(),
        config.notification.app_origin.clone(),
        lifecycle.subscribe(),
    ));

    let state = AppState {
        gateway,
        scheduler: scheduler.clone(),
        cache,
        clients,
        windows,
        app_origin: config.notification.app_origin.clone(),
    };
    let web_server = WebServer::new(state, config.web.clone());
    let web_url = web_server.url();
    let web_shutdown_rx = lifecycle.subscribe();
    tokio::spawn(async move {
        if let Err(e) = web_server.run(web_shutdown_rx).await {
            error!("웹 서버 오류: {e}");
        }
    });
    info!("로컬 API: {web_url}");

    info!("Task Quest 워커 실행 중 (Ctrl+C로 종료)");

    // OS 시그널 대기
    lifecycle.wait_for_signal().await?;

    scheduler.stop();
    if tokio::time::timeout(SHUTDOWN_GRACE, gateway_task).await.is_err() {
        warn!("메시지 게이트웨이 종료 대기 시간 초과");
    }

    info!("Task Quest 워커 종료");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["taskquest"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn cli_overrides_config() {
        let mut config = AppConfig::default_config();
        apply_overrides(
            &mut config,
            &args(&["--port", "9300", "--locale", "ar", "--start"]),
        );

        assert_eq!(config.web.port, 9300);
        assert_eq!(config.notification.locale, LocaleSetting::Ar);
        assert!(config.notification.start_on_boot);
    }

    #[test]
    fn no_overrides_keep_config() {
        let mut config = AppConfig::default_config();
        apply_overrides(&mut config, &args(&[]));

        assert_eq!(config.web.port, 9190);
        assert_eq!(config.notification.locale, LocaleSetting::Auto);
        assert!(!config.notification.start_on_boot);
    }

    #[test]
    fn invalid_locale_is_rejected_by_cli() {
        let result = Args::try_parse_from(["taskquest", "--locale", "fr"]);
        assert!(result.is_err());
    }

    #[test]
    fn db_path_precedence() {
        let configured = PathBuf::from("/var/lib/taskquest/custom.db");

        assert_eq!(
            resolve_db_path(Some("/tmp/tq"), Some(&configured)),
            PathBuf::from("/tmp/tq").join("cache.db")
        );
        assert_eq!(resolve_db_path(None, Some(&configured)), configured);
        assert!(resolve_db_path(None, None).ends_with("cache.db"));
    }
}
