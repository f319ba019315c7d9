//! 버전별 정적 자산 캐시 관리.
//!
//! - install: 사전 캐시 목록을 모두 받아 현재 버전 캐시에 저장 (하나라도 실패하면 아무것도 저장하지 않음)
//! - activate: 현재 버전이 아닌 캐시 전부 삭제
//! - fetch: 캐시 우선, 없으면 네트워크 (네트워크 응답은 캐시에 다시 쓰지 않음)

use futures::future::try_join_all;
use std::sync::Arc;
use taskquest_core::config::CacheConfig;
use taskquest_core::error::CoreError;
use taskquest_core::models::cache::CachedResponse;
use taskquest_core::ports::cache_storage::CacheStorage;
use taskquest_core::ports::fetcher::NetworkFetcher;
use tracing::{debug, info, warn};

/// 응답 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Network,
}

/// 캐시 우선 조회 결과
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub response: CachedResponse,
    pub source: FetchSource,
}

/// 캐시 매니저
pub struct CacheManager {
    version: String,
    precache_urls: Vec<String>,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn NetworkFetcher>,
}

impl CacheManager {
    pub fn new(
        config: &CacheConfig,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetcher>,
    ) -> Self {
        Self {
            version: config.version.clone(),
            precache_urls: config.precache_urls.clone(),
            storage,
            fetcher,
        }
    }

    /// 현재 캐시 버전 (캐시 이름)
    pub fn version(&self) -> &str {
        &self.version
    }

    /// 사전 캐시 설치
    ///
    /// 모든 URL을 먼저 받아 온 뒤 저장한다. 하나라도 실패하면 에러를 반환하고
    /// 현재 버전 캐시에는 아무것도 기록하지 않는다. 성공 시 저장한 항목 수 반환.
    pub async fn install(&self) -> Result<usize, CoreError> {
        info!(
            "캐시 설치 시작: {} ({}개 URL)",
            self.version,
            self.precache_urls.len()
        );

        let responses = try_join_all(self.precache_urls.iter().map(|url| async move {
            let response = self.fetcher.fetch(url).await?;
            if !response.is_success() {
                return Err(CoreError::Network(format!(
                    "사전 캐시 응답 실패 {url}: HTTP {}",
                    response.status
                )));
            }
            Ok(response)
        }))
        .await
        .map_err(|e| {
            warn!("캐시 설치 실패: {e}");
            CoreError::Cache(format!("캐시 설치 실패 ({}): {e}", self.version))
        })?;

        self.storage.put_all(&self.version, &responses).await?;

        info!("캐시 설치 완료: {} ({}개 항목)", self.version, responses.len());
        Ok(responses.len())
    }

    /// 이전 버전 캐시 정리: 삭제한 캐시 이름 목록 반환
    pub async fn activate(&self) -> Result<Vec<String>, CoreError> {
        let mut deleted = Vec::new();
        for name in self.storage.keys().await? {
            if name == self.version {
                continue;
            }
            if self.storage.delete(&name).await? {
                info!("이전 캐시 삭제: {name}");
                deleted.push(name);
            }
        }
        debug!("캐시 활성화: {} (삭제 {}개)", self.version, deleted.len());
        Ok(deleted)
    }

    /// 캐시 우선 조회
    ///
    /// 저장소 조회가 실패하면 네트워크로 넘어간다.
    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, CoreError> {
        match self.storage.match_url(url).await {
            Ok(Some(response)) => {
                debug!("캐시 적중: {url}");
                return Ok(FetchOutcome {
                    response,
                    source: FetchSource::Cache,
                });
            }
            Ok(None) => debug!("캐시 미스: {url}"),
            Err(e) => warn!("캐시 조회 실패, 네트워크로 대체: {e}"),
        }

        let response = self.fetcher.fetch(url).await?;
        Ok(FetchOutcome {
            response,
            source: FetchSource::Network,
        })
    }
}
