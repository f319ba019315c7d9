//! API 핸들러 모듈.

pub mod assets;
pub mod clients;
pub mod messages;
pub mod notifications;
pub mod scheduler;
