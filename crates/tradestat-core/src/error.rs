//! 통계 플랫폼의 에러 타입.
//!
//! 이 모듈은 플랫폼 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 통계 에러.
#[derive(Debug, Error)]
pub enum StatsError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 저장소 에러
    #[error("저장소 에러: {0}")]
    Database(String),

    /// 잘못된 통계 기간 (0 이하의 일수)
    #[error("잘못된 통계 기간: {0}일")]
    InvalidWindow(i64),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 통계 작업을 위한 Result 타입.
pub type StatsResult<T> = Result<T, StatsError>;

impl StatsError {
    /// 호출자 입력이 원인인 에러인지 확인합니다.
    ///
    /// 입력 에러는 재시도해도 결과가 달라지지 않습니다.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            StatsError::InvalidWindow(_) | StatsError::NotFound(_)
        )
    }

    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StatsError::Database(_))
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for StatsError {
    fn from(err: config::ConfigError) -> Self {
        StatsError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_invalid_input() {
        let window_err = StatsError::InvalidWindow(-3);
        assert!(window_err.is_invalid_input());

        let db_err = StatsError::Database("connection refused".to_string());
        assert!(!db_err.is_invalid_input());
    }

    #[test]
    fn test_error_retryable() {
        let db_err = StatsError::Database("pool timeout".to_string());
        assert!(db_err.is_retryable());

        let window_err = StatsError::InvalidWindow(0);
        assert!(!window_err.is_retryable());
    }

    #[test]
    fn test_invalid_window_message() {
        let err = StatsError::InvalidWindow(0);
        assert!(err.to_string().contains("0일"));
    }
}
