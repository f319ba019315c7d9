//! 네트워크 자산 조회 포트.
//!
//! 구현: `taskquest-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::cache::CachedResponse;

/// 네트워크에서 자산을 가져오는 인터페이스
#[async_trait]
pub trait NetworkFetcher: Send + Sync {
    /// URL 경로의 자산 조회: 2xx가 아니면 `CoreError::Network`
    async fn fetch(&self, url: &str) -> Result<CachedResponse, CoreError>;
}
