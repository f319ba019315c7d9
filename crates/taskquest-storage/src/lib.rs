//! # taskquest-storage
//!
//! 로컬 저장소 어댑터.
//! 버전별 정적 자산 캐시를 SQLite에 저장한다.
//!
//! ## 모듈
//! - `sqlite`: 캐시 저장소 (CacheStorage 구현)
//! - `migration`: 스키마 마이그레이션

pub mod migration;
pub mod sqlite;
