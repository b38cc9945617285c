//! # Tradestat Core
//!
//! 트레이딩 성과 통계 플랫폼의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 플랫폼 전반에서 사용되는 기본 타입을 제공합니다:
//! - 청산 거래 기록
//! - 통계 스냅샷 및 집계 결과 타입
//! - 사용자 트레이딩 설정
//! - 거래 기록 저장소 추상화
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
