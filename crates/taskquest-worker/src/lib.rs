//! # taskquest-worker
//!
//! 백그라운드 워커.
//! 포그라운드 앱이 보낸 태스크 스냅샷으로 2시간 주기 알림을 발송하고,
//! 알림 클릭을 앱 창으로 라우팅하며, 버전별 정적 자산 캐시를 관리한다.

pub mod cache_manager;
pub mod click;
pub mod content;
pub mod gateway;
pub mod scheduler;
