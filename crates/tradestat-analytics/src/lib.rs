//! # Tradestat Analytics
//!
//! 청산 거래 기록으로부터 트레이딩 성과 통계를 계산합니다.
//!
//! - `statistics` - 순수 통계 계산 엔진 (승률, Profit Factor,
//!   샤프/소르티노 비율, 최대 낙폭, 전략별 집계, 일별 손익)
//! - `service` - 저장소 조회와 엔진 계산을 연결하는 서비스 계층

pub mod service;
pub mod statistics;

pub use service::StatsService;
pub use statistics::StatisticsEngine;
