//! SQLite 저장소 어댑터.
//!
//! `CacheStorage` 포트 구현.
//!
//! # 모듈 구조
//! - `cache`: 이름 붙은 캐시 + 캐시 항목 저장 (CacheStorage 포트)

mod cache;

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use taskquest_core::error::CoreError;
use tracing::info;

use crate::migration;

/// SQLite 캐시 저장소: `CacheStorage` 포트 구현
pub struct SqliteCacheStorage {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteCacheStorage {
    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| CoreError::Internal(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            ",
        )
        .map_err(|e| CoreError::Internal(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Internal(format!("마이그레이션 실패: {e}")))?;

        info!("SQLite 캐시 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Internal(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Internal(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}
