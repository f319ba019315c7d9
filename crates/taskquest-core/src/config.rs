//! 애플리케이션 설정 구조체.
//!
//! 알림 표시 옵션, 캐시 버전/사전 캐시 목록, 저장소 경로, 로컬 API 서버 설정을
//! 정의한다. `ConfigManager`를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::notification::Locale;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 주기 알림 설정
    #[serde(default)]
    pub notification: NotificationConfig,
    /// 정적 자산 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 로컬 API 서버 설정
    #[serde(default)]
    pub web: WebConfig,
}

// ============================================================
// 알림 설정
// ============================================================

/// 알림 언어 설정
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleSetting {
    /// 시스템 언어 감지 (실패 시 영어)
    #[default]
    Auto,
    /// 아랍어 고정
    Ar,
    /// 영어 고정
    En,
}

impl LocaleSetting {
    /// 감지된 언어 태그(예: `LANG`)와 함께 실제 로케일 결정
    pub fn resolve(self, detected_tag: Option<&str>) -> Locale {
        match self {
            LocaleSetting::Ar => Locale::Ar,
            LocaleSetting::En => Locale::En,
            LocaleSetting::Auto => Locale::detect(detected_tag),
        }
    }
}

/// 주기 알림 설정
///
/// 알림 주기(2시간)와 첫 알림 지연(5초)은 스케줄러 상수이며 설정 항목이 아니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 부팅 시 포그라운드 메시지 없이 주기 알림 시작
    #[serde(default)]
    pub start_on_boot: bool,
    /// 알림 언어
    #[serde(default)]
    pub locale: LocaleSetting,
    /// 알림 아이콘 경로
    #[serde(default = "default_icon")]
    pub icon: String,
    /// 알림 배지 경로
    #[serde(default = "default_badge")]
    pub badge: String,
    /// 포그라운드 앱 origin (알림 클릭 시 창 매칭 기준)
    #[serde(default = "default_app_origin")]
    pub app_origin: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            start_on_boot: false,
            locale: LocaleSetting::Auto,
            icon: default_icon(),
            badge: default_badge(),
            app_origin: default_app_origin(),
        }
    }
}

// ============================================================
// 캐시 설정
// ============================================================

/// 정적 자산 캐시 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 현재 캐시 버전 태그 (캐시 이름으로 사용)
    #[serde(default = "default_cache_version")]
    pub version: String,
    /// 설치 시 사전 캐시할 URL 목록
    #[serde(default = "default_precache_urls")]
    pub precache_urls: Vec<String>,
    /// 자산을 가져올 origin
    #[serde(default = "default_app_origin")]
    pub asset_origin: String,
    /// 네트워크 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            version: default_cache_version(),
            precache_urls: default_precache_urls(),
            asset_origin: default_app_origin(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

// ============================================================
// 저장소/웹 설정
// ============================================================

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite DB 파일 경로 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// 로컬 API 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 서버 포트 (기본: 9190)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            notification: NotificationConfig::default(),
            cache: CacheConfig::default(),
            storage: StorageConfig::default(),
            web: WebConfig::default(),
        }
    }

    /// 자산 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.cache.request_timeout_ms)
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_icon() -> String {
    "/icons/icon-192x192.png".to_string()
}
fn default_badge() -> String {
    "/icons/badge-72x72.png".to_string()
}
fn default_app_origin() -> String {
    "http://localhost:5173".to_string()
}
fn default_cache_version() -> String {
    "task-quest-v1".to_string()
}
fn default_precache_urls() -> Vec<String> {
    vec![
        "/".to_string(),
        "/index.html".to_string(),
        "/manifest.json".to_string(),
        "/icons/icon-192x192.png".to_string(),
    ]
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_web_port() -> u16 {
    9190
}
