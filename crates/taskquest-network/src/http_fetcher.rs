//! HTTP 자산 페처.
//!
//! `NetworkFetcher` 포트 구현. 앱 origin 기준 상대 경로를 GET으로 가져온다.

use async_trait::async_trait;
use std::time::Duration;
use taskquest_core::error::CoreError;
use taskquest_core::models::cache::CachedResponse;
use taskquest_core::ports::fetcher::NetworkFetcher;
use tracing::debug;
use url::Url;

/// HTTP 자산 페처: `NetworkFetcher` 포트 구현
pub struct HttpFetcher {
    client: reqwest::Client,
    origin: Url,
}

impl HttpFetcher {
    /// 새 HTTP 페처 생성
    pub fn new(origin: &str, timeout: Duration) -> Result<Self, CoreError> {
        let origin = Url::parse(origin)
            .map_err(|e| CoreError::Config(format!("잘못된 자산 origin '{origin}': {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self { client, origin })
    }

    /// 자산 origin
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// 요청 경로를 절대 URL로 변환
    ///
    /// 결과는 항상 자산 origin 안에 있어야 한다. `//host/...` 같은
    /// 스킴 상대 경로나 절대 URL로 다른 호스트를 가리키면 거부한다.
    fn resolve(&self, path: &str) -> Result<Url, CoreError> {
        let target = self
            .origin
            .join(path)
            .map_err(|e| CoreError::validation("url", format!("잘못된 자산 경로 '{path}': {e}")))?;

        if target.origin() != self.origin.origin() {
            return Err(CoreError::validation(
                "url",
                format!("자산 origin 밖의 경로: {path}"),
            ));
        }
        Ok(target)
    }
}

#[async_trait]
impl NetworkFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, CoreError> {
        let target = self.resolve(url)?;
        debug!("자산 요청: {target}");

        let resp = self
            .client
            .get(target.clone())
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("자산 요청 실패 ({target}): {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Network(format!(
                "자산 응답 실패 ({target}): HTTP {}",
                status.as_u16()
            )));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = resp
            .bytes()
            .await
            .map_err(|e| CoreError::Network(format!("응답 본문 읽기 실패 ({target}): {e}")))?;

        Ok(CachedResponse::new(
            url,
            status.as_u16(),
            content_type,
            body.to_vec(),
        ))
    }
}
