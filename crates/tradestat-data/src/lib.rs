//! # Tradestat Data
//!
//! 거래 기록과 사용자 설정의 Postgres 영속 계층을 제공합니다.
//!
//! - `storage::postgres` - 통계 작업용 연결 풀 구성 및 마이그레이션
//! - `storage::trades` - 청산 거래 repository (`TradeRecordStore` 구현)
//! - `storage::settings` - 사용자 트레이딩 설정 repository

pub mod error;
pub mod storage;

pub use error::{DataError, Result};
pub use storage::postgres::DatabaseConfig;
pub use storage::settings::UserSettingsRepository;
pub use storage::trades::TradeRepository;
