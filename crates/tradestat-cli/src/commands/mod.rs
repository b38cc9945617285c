//! CLI 명령 구현.

pub mod record;
pub mod report;
pub mod settings;

use tracing::info;
use tradestat_core::AppConfig;
use tradestat_data::{DataError, DatabaseConfig};

/// 설정 파일을 로드합니다.
///
/// 파일이 없으면 기본값으로 동작합니다.
pub fn load_config(path: &str) -> Result<AppConfig, config::ConfigError> {
    if std::path::Path::new(path).exists() {
        AppConfig::load(path)
    } else {
        info!(path, "Config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

/// 데이터베이스 접속 설정을 구성합니다.
///
/// 접속 문자열은 `--db-url` 인자 또는 `DATABASE_URL` 환경 변수에서
/// 가져오고, 풀 튜닝 값은 애플리케이션 설정을 따릅니다. 실제 연결은
/// 각 명령이 자신의 repository를 만들 때 일어납니다.
pub fn db_config(db_url: Option<String>, app_config: &AppConfig) -> Result<DatabaseConfig, DataError> {
    let url = db_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or_else(|| DataError::ConfigError("DATABASE_URL is not set".to_string()))?;

    let mut config = DatabaseConfig::with_url(url);
    config.max_connections = app_config.database.max_connections;
    config.acquire_timeout_secs = app_config.database.acquire_timeout_secs;
    config.statement_timeout_ms = app_config.database.statement_timeout_ms;

    Ok(config)
}
