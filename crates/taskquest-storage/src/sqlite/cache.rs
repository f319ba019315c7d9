//! 캐시 스토리지 (CacheStorage 포트 구현).
//!
//! 캐시 이름(버전 태그)별 항목 저장, 생성 순서 기반 조회, 캐시 단위 삭제.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Transaction};
use std::sync::MutexGuard;
use taskquest_core::error::CoreError;
use taskquest_core::models::cache::CachedResponse;
use taskquest_core::ports::cache_storage::CacheStorage;
use tracing::debug;

use super::SqliteCacheStorage;

/// DB 행 (cached_at은 RFC3339 문자열)
type EntryRow = (String, u16, Option<String>, Vec<u8>, String);

impl SqliteCacheStorage {
    fn lock(&self) -> Result<MutexGuard<'_, rusqlite::Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))
    }

    /// 캐시 ID 조회 (없으면 생성)
    fn ensure_cache(tx: &Transaction<'_>, cache_name: &str) -> Result<i64, rusqlite::Error> {
        tx.execute(
            "INSERT OR IGNORE INTO caches (name) VALUES (?1)",
            params![cache_name],
        )?;
        tx.query_row(
            "SELECT id FROM caches WHERE name = ?1",
            params![cache_name],
            |row| row.get(0),
        )
    }

    fn insert_entry(
        tx: &Transaction<'_>,
        cache_id: i64,
        response: &CachedResponse,
    ) -> Result<(), rusqlite::Error> {
        tx.execute(
            "INSERT OR REPLACE INTO cache_entries (cache_id, url, status, content_type, body, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                cache_id,
                response.url,
                response.status,
                response.content_type,
                response.body,
                response.cached_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn row_to_response(row: EntryRow) -> Result<CachedResponse, CoreError> {
        let (url, status, content_type, body, cached_at) = row;
        let cached_at = DateTime::parse_from_rfc3339(&cached_at)
            .map_err(|e| CoreError::Cache(format!("잘못된 cached_at '{cached_at}': {e}")))?
            .with_timezone(&Utc);
        Ok(CachedResponse {
            url,
            status,
            content_type,
            body,
            cached_at,
        })
    }

    /// 여러 응답을 한 트랜잭션으로 저장
    fn put_batch(&self, cache_name: &str, responses: &[CachedResponse]) -> Result<(), CoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::Cache(format!("트랜잭션 시작 실패: {e}")))?;

        let cache_id = Self::ensure_cache(&tx, cache_name)
            .map_err(|e| CoreError::Cache(format!("캐시 생성 실패 ({cache_name}): {e}")))?;
        for response in responses {
            Self::insert_entry(&tx, cache_id, response)
                .map_err(|e| CoreError::Cache(format!("캐시 항목 저장 실패 ({}): {e}", response.url)))?;
        }

        tx.commit()
            .map_err(|e| CoreError::Cache(format!("트랜잭션 커밋 실패: {e}")))?;

        debug!("캐시 저장: {cache_name} ({}개 항목)", responses.len());
        Ok(())
    }
}

#[async_trait]
impl CacheStorage for SqliteCacheStorage {
    async fn put(&self, cache_name: &str, response: &CachedResponse) -> Result<(), CoreError> {
        self.put_batch(cache_name, std::slice::from_ref(response))
    }

    async fn put_all(
        &self,
        cache_name: &str,
        responses: &[CachedResponse],
    ) -> Result<(), CoreError> {
        self.put_batch(cache_name, responses)
    }

    async fn match_url(&self, url: &str) -> Result<Option<CachedResponse>, CoreError> {
        let row: Option<EntryRow> = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT e.url, e.status, e.content_type, e.body, e.cached_at
                 FROM cache_entries e JOIN caches c ON c.id = e.cache_id
                 WHERE e.url = ?1
                 ORDER BY c.id ASC
                 LIMIT 1",
                params![url],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| CoreError::Cache(format!("캐시 조회 실패 ({url}): {e}")))?
        };

        row.map(Self::row_to_response).transpose()
    }

    async fn keys(&self) -> Result<Vec<String>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT name FROM caches ORDER BY id ASC")
            .map_err(|e| CoreError::Cache(format!("쿼리 준비 실패: {e}")))?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| CoreError::Cache(format!("캐시 목록 조회 실패: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::Cache(format!("캐시 목록 조회 실패: {e}")))?;

        Ok(names)
    }

    async fn delete(&self, cache_name: &str) -> Result<bool, CoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::Cache(format!("트랜잭션 시작 실패: {e}")))?;

        tx.execute(
            "DELETE FROM cache_entries WHERE cache_id IN (SELECT id FROM caches WHERE name = ?1)",
            params![cache_name],
        )
        .map_err(|e| CoreError::Cache(format!("캐시 항목 삭제 실패 ({cache_name}): {e}")))?;
        let deleted = tx
            .execute("DELETE FROM caches WHERE name = ?1", params![cache_name])
            .map_err(|e| CoreError::Cache(format!("캐시 삭제 실패 ({cache_name}): {e}")))?;

        tx.commit()
            .map_err(|e| CoreError::Cache(format!("트랜잭션 커밋 실패: {e}")))?;

        Ok(deleted > 0)
    }

    async fn entry_count(&self, cache_name: &str) -> Result<usize, CoreError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM cache_entries e JOIN caches c ON c.id = e.cache_id
                 WHERE c.name = ?1",
                params![cache_name],
                |row| row.get(0),
            )
            .map_err(|e| CoreError::Cache(format!("캐시 항목 수 조회 실패: {e}")))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(url: &str, body: &str) -> CachedResponse {
        CachedResponse::new(
            url,
            200,
            Some("text/html".to_string()),
            body.as_bytes().to_vec(),
        )
    }

    #[tokio::test]
    async fn put_and_match() {
        let storage = SqliteCacheStorage::open_in_memory().unwrap();
        let original = response("/index.html", "<html></html>");

        storage.put("task-quest-v1", &original).await.unwrap();

        let found = storage.match_url("/index.html").await.unwrap().unwrap();
        assert_eq!(found.body, original.body);
        assert_eq!(found.content_type.as_deref(), Some("text/html"));
        assert_eq!(found.cached_at.timestamp(), original.cached_at.timestamp());
        assert!(storage.match_url("/missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_overwrites_same_url() {
        let storage = SqliteCacheStorage::open_in_memory().unwrap();

        storage.put("v1", &response("/", "old")).await.unwrap();
        storage.put("v1", &response("/", "new")).await.unwrap();

        assert_eq!(storage.entry_count("v1").await.unwrap(), 1);
        let found = storage.match_url("/").await.unwrap().unwrap();
        assert_eq!(found.body, b"new");
    }

    #[tokio::test]
    async fn match_prefers_oldest_cache() {
        let storage = SqliteCacheStorage::open_in_memory().unwrap();

        storage.put("v1", &response("/", "first")).await.unwrap();
        storage.put("v2", &response("/", "second")).await.unwrap();

        let found = storage.match_url("/").await.unwrap().unwrap();
        assert_eq!(found.body, b"first");
        assert_eq!(storage.keys().await.unwrap(), vec!["v1", "v2"]);
    }

    #[tokio::test]
    async fn delete_removes_cache_and_entries() {
        let storage = SqliteCacheStorage::open_in_memory().unwrap();
        storage
            .put_all("v1", &[response("/", "a"), response("/app.js", "b")])
            .await
            .unwrap();
        storage.put("v2", &response("/", "c")).await.unwrap();

        assert!(storage.delete("v1").await.unwrap());
        assert!(!storage.delete("v1").await.unwrap());

        assert_eq!(storage.entry_count("v1").await.unwrap(), 0);
        assert_eq!(storage.keys().await.unwrap(), vec!["v2"]);
        assert!(storage.match_url("/app.js").await.unwrap().is_none());
        assert_eq!(storage.match_url("/").await.unwrap().unwrap().body, b"c");
    }

    #[tokio::test]
    async fn file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.db");

        {
            let storage = SqliteCacheStorage::open(&path).unwrap();
            storage.put("v1", &response("/", "persisted")).await.unwrap();
        }

        let storage = SqliteCacheStorage::open(&path).unwrap();
        assert_eq!(storage.keys().await.unwrap(), vec!["v1"]);
        assert_eq!(storage.match_url("/").await.unwrap().unwrap().body, b"persisted");
    }
}
