//! Task Quest 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러를 `CoreError`로 변환해 포트 경계를 넘긴다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 메시지 검증, 캐시/네트워크 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패 (워커 메시지 경계 검증 등)
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "Cache", "Window")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// 네트워크 에러 (연결 실패, 타임아웃, 비정상 상태 코드)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 캐시 저장소 에러
    #[error("캐시 에러: {0}")]
    Cache(String),

    /// 알림 표시 실패
    #[error("알림 에러: {0}")]
    Notification(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 필드 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = CoreError::validation("type", "알 수 없는 메시지");
        assert_eq!(err.to_string(), "유효성 검증 실패: type: 알 수 없는 메시지");
    }

    #[test]
    fn serde_error_converts() {
        let err: CoreError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }
}
