//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 설정은 TOML 파일에서 로드하며 `TRADESTAT__` 접두사의
//! 환경 변수로 오버라이드할 수 있습니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 데이터베이스 풀 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 통계 계산 설정
    #[serde(default)]
    pub statistics: StatisticsConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 데이터베이스 풀 설정.
///
/// 접속 문자열은 여기 포함되지 않으며 `DATABASE_URL` 환경 변수로
/// 전달됩니다. 통계 조회는 읽기 위주의 짧은 작업이므로 풀은 작게,
/// 집계 쿼리에는 세션 statement_timeout을 둡니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
    /// 세션 statement_timeout (밀리초, 0 = 제한 없음)
    pub statement_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout_secs: 10,
            statement_timeout_ms: 30_000,
        }
    }
}

/// 통계 계산 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatisticsConfig {
    /// 기간 미지정 시 사용하는 통계 윈도우 (일)
    pub default_window_days: i64,
    /// 저조 전략 판정 기준 승률 (백분율)
    pub min_win_rate_pct: Decimal,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            default_window_days: 30,
            min_win_rate_pct: dec!(40),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("statistics.default_window_days", 30)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("TRADESTAT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.statistics.default_window_days, 30);
        assert_eq!(config.statistics.min_win_rate_pct, dec!(40));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.statement_timeout_ms, 30_000);
    }

    #[test]
    fn test_statistics_config_window_positive() {
        // 기본 윈도우는 항상 유효한 양수여야 한다
        let config = StatisticsConfig::default();
        assert!(config.default_window_days > 0);
    }
}
