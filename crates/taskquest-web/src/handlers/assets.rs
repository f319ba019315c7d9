//! 캐시 우선 정적 자산 서빙.
//!
//! API 라우트에 걸리지 않은 GET 요청을 캐시 → 네트워크 순으로 처리한다.

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use taskquest_worker::cache_manager::FetchSource;

use crate::error::ApiError;
use crate::AppState;

/// 캐시 적중 여부 응답 헤더
pub const CACHE_STATUS_HEADER: &str = "x-taskquest-cache";

const API_PREFIX: &str = "/api";

/// 매칭되지 않은 API 경로는 자산으로 취급하지 않는다
fn is_api_path(path: &str) -> bool {
    path == API_PREFIX || path.starts_with("/api/")
}

/// fallback 핸들러
pub async fn serve_cached(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, ApiError> {
    if method != Method::GET || is_api_path(uri.path()) {
        return Err(ApiError::NotFound(format!("{method} {}", uri.path())));
    }

    let url = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    let outcome = state.cache.fetch(url).await?;
    let response = outcome.response;

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    let content_type = response.content_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(uri.path())
            .first_or_octet_stream()
            .to_string()
    });
    let cache_status = match outcome.source {
        FetchSource::Cache => "hit",
        FetchSource::Network => "miss",
    };

    let mut resp = (status, response.body).into_response();
    let headers = resp.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    headers.insert(CACHE_STATUS_HEADER, HeaderValue::from_static(cache_status));
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_paths_are_not_assets() {
        assert!(is_api_path("/api"));
        assert!(is_api_path("/api/unknown"));
        assert!(!is_api_path("/apis.json"));
        assert!(!is_api_path("/index.html"));
    }
}
