//! Task Quest 워커 도메인 모델.
//!
//! 포그라운드 앱과 워커가 주고받는 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod cache;
pub mod message;
pub mod notification;
pub mod task;
