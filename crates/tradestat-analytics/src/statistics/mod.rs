//! 통계 계산 모듈.

pub mod engine;

pub use engine::{StatisticsEngine, ANNUALIZATION_DAYS};
