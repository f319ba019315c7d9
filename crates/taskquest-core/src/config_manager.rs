//! 설정 파일 로드.
//!
//! 설정은 JSON 파일 하나로 관리한다. 파일이 없으면 기본값으로 생성하고,
//! 있으면 누락된 필드만 기본값으로 채워 읽는다. 설정/데이터 디렉토리는
//! `directories::ProjectDirs` 한 곳에서 결정한다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 플랫폼 디렉토리 식별자 (qualifier, organization, application)
const PROJECT_ID: (&str, &str, &str) = ("com", "taskquest", "worker");

/// 로드된 설정과 그 파일 경로
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 기본 경로의 설정 파일 로드 (없으면 생성)
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(Self::default_config_path()?)
    }

    /// 지정 경로의 설정 파일 로드 (없으면 생성)
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        let config = if config_path.exists() {
            load(&config_path)?
        } else {
            let config = AppConfig::default_config();
            write(&config_path, &config)?;
            info!("기본 설정 파일 생성: {}", config_path.display());
            config
        };

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 로드된 설정
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 설정 소유권 넘기기
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 플랫폼별 앱 디렉토리
    ///
    /// - macOS: `~/Library/Application Support/com.taskquest.worker/`
    /// - Windows: `%APPDATA%\taskquest\worker\`
    /// - Linux: `$XDG_CONFIG_HOME/worker/`, `$XDG_DATA_HOME/worker/`
    pub fn project_dirs() -> Option<ProjectDirs> {
        let (qualifier, organization, application) = PROJECT_ID;
        ProjectDirs::from(qualifier, organization, application)
    }

    /// 기본 설정 파일 경로
    pub fn default_config_path() -> Result<PathBuf, CoreError> {
        Self::project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
    }

    /// 기본 데이터 디렉토리 (캐시 DB 위치)
    pub fn default_data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }
}

fn load(path: &Path) -> Result<AppConfig, CoreError> {
    let content = fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!("설정 파일 읽기 실패: {}: {e}", path.display()))
    })?;

    let config = serde_json::from_str(&content).map_err(|e| {
        CoreError::Config(format!("설정 파일 파싱 실패: {}: {e}", path.display()))
    })?;

    debug!("설정 파일 로드: {}", path.display());
    Ok(config)
}

fn write(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::Config(format!("설정 디렉토리 생성 실패: {}: {e}", parent.display()))
        })?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).map_err(|e| {
        CoreError::Config(format!("설정 파일 저장 실패: {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocaleSetting;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();

        assert!(config_path.exists());
        assert_eq!(manager.config().web.port, 9190);
        assert_eq!(manager.config_path(), config_path);
    }

    #[test]
    fn existing_file_is_loaded_with_missing_fields_defaulted() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"notification":{"locale":"ar"},"cache":{"version":"task-quest-v2"}}"#,
        )
        .unwrap();

        let config = ConfigManager::with_path(config_path).unwrap().into_config();

        assert_eq!(config.notification.locale, LocaleSetting::Ar);
        assert_eq!(config.cache.version, "task-quest-v2");
        assert_eq!(config.web.port, 9190);
        assert!(!config.cache.precache_urls.is_empty());
    }

    #[test]
    fn existing_file_is_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let raw = r#"{"web":{"port":7777}}"#;
        fs::write(&config_path, raw).unwrap();

        ConfigManager::with_path(config_path.clone()).unwrap();

        assert_eq!(fs::read_to_string(&config_path).unwrap(), raw);
    }

    #[test]
    fn broken_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{ not json").unwrap();

        let err = ConfigManager::with_path(config_path).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn default_paths_share_project_dirs() {
        // 홈 디렉토리가 없는 환경에서는 둘 다 없음
        let Some(dirs) = ConfigManager::project_dirs() else {
            assert!(ConfigManager::default_data_dir().is_none());
            return;
        };

        assert_eq!(
            ConfigManager::default_config_path().unwrap(),
            dirs.config_dir().join("config.json")
        );
        assert_eq!(ConfigManager::default_data_dir().unwrap(), dirs.data_dir());
    }
}
