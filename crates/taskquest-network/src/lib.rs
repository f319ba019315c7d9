//! # taskquest-network
//!
//! 네트워크 어댑터.
//! 앱 origin에서 정적 자산을 HTTP로 가져온다 (`NetworkFetcher` 포트 구현).

pub mod http_fetcher;
