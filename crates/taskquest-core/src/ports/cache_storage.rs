//! 버전별 캐시 저장소 포트.
//!
//! 이름 붙은 캐시 여러 개를 관리한다 (캐시 이름 = 버전 태그).
//! 구현: `taskquest-storage` crate (rusqlite)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::cache::CachedResponse;

/// 캐시 저장소
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// 응답 저장 (같은 캐시/URL이면 덮어씀)
    async fn put(&self, cache_name: &str, response: &CachedResponse) -> Result<(), CoreError>;

    /// 여러 응답 저장. 구현체가 원자적 저장을 지원하면 재정의한다.
    async fn put_all(
        &self,
        cache_name: &str,
        responses: &[CachedResponse],
    ) -> Result<(), CoreError> {
        for response in responses {
            self.put(cache_name, response).await?;
        }
        Ok(())
    }

    /// 모든 캐시에서 URL 조회 (먼저 생성된 캐시 우선)
    async fn match_url(&self, url: &str) -> Result<Option<CachedResponse>, CoreError>;

    /// 존재하는 캐시 이름 목록
    async fn keys(&self) -> Result<Vec<String>, CoreError>;

    /// 캐시 삭제: 존재했으면 true
    async fn delete(&self, cache_name: &str) -> Result<bool, CoreError>;

    /// 캐시에 저장된 항목 수
    async fn entry_count(&self, cache_name: &str) -> Result<usize, CoreError>;
}
