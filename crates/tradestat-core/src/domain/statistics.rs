//! 통계 결과 타입.
//!
//! 통계 엔진이 생성하는 결과 타입을 정의합니다:
//! - `StatisticsSnapshot` - 사용자 성과 스냅샷
//! - `StrategyPerformanceRow` - 전략별 집계 행
//! - `StrategyPerformance` - 전략 성과 조회 결과
//! - `DailyProfitPoint` - 일별 손익 포인트
//!
//! 모든 타입은 식별자 없는 순수 값이며, 요청 시마다 재계산됩니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 사용자 성과 통계 스냅샷.
///
/// 주어진 기간의 청산 거래로부터 계산된 불변 결과입니다.
/// `Default`는 표준 빈 스냅샷(모든 필드 0)이며, 입력 거래가 없을 때
/// 나눗셈 에러 대신 이 값이 반환됩니다. `Decimal`은 NaN/무한대를
/// 표현할 수 없으므로 모든 필드는 항상 유한합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    /// 총 손익 (확정 손익 합계)
    pub total_profit: Decimal,
    /// 총 거래 횟수 (손익 확정 거래만)
    pub total_trades: usize,
    /// 수익 거래 횟수 (손익 > 0)
    pub winning_trades: usize,
    /// 손실 거래 횟수 (손익 <= 0, 본전 포함)
    pub losing_trades: usize,
    /// 승률 (백분율)
    pub win_rate_pct: Decimal,
    /// 평균 수익 (수익 거래만)
    pub avg_win: Decimal,
    /// 평균 손실 (손실 거래의 절대값 평균)
    pub avg_loss: Decimal,
    /// Profit Factor (총수익 / 총손실 절대값, 손실 없으면 0)
    pub profit_factor: Decimal,
    /// 샤프 비율 (일 단위 거래 수익 기준, 연 365일 환산)
    pub sharpe_ratio: Decimal,
    /// 소르티노 비율 (하방 변동성 기준, 연 365일 환산)
    pub sortino_ratio: Decimal,
    /// 최대 낙폭 (누적 손익 고점 대비, 백분율)
    pub max_drawdown_pct: Decimal,
}

impl StatisticsSnapshot {
    /// 표준 빈 스냅샷을 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 통계에 포함된 거래가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.total_trades == 0
    }

    /// 성과 요약을 문자열로 반환합니다.
    ///
    /// 로그 출력용 한 줄 요약입니다.
    pub fn summary(&self) -> String {
        format!(
            "거래: {} | 승률: {:.1}% | PF: {:.2} | 샤프: {:.2} | MDD: {:.1}% | 손익: {:.2}",
            self.total_trades,
            self.win_rate_pct,
            self.profit_factor,
            self.sharpe_ratio,
            self.max_drawdown_pct,
            self.total_profit
        )
    }
}

/// 전략별 성과 집계 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPerformanceRow {
    /// 전략 이름
    pub strategy_name: String,
    /// 전략의 총 손익
    pub total_profit: Decimal,
    /// 거래 횟수 (손익 확정 거래만)
    pub trade_count: usize,
    /// 수익 거래 횟수 (손익 > 0)
    pub winning_trades: usize,
    /// 승률 (백분율)
    pub win_rate_pct: Decimal,
}

impl StrategyPerformanceRow {
    /// 빈 집계 행을 생성합니다.
    pub fn new(strategy_name: impl Into<String>) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            total_profit: Decimal::ZERO,
            trade_count: 0,
            winning_trades: 0,
            win_rate_pct: Decimal::ZERO,
        }
    }
}

/// 전략 성과 조회 결과.
///
/// 전략 필터가 없으면 전략별 집계 목록, 특정 전략을 지정하면
/// 해당 전략으로 범위를 좁힌 상세 스냅샷이 반환됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrategyPerformance {
    /// 전략별 집계 (총 손익 내림차순)
    Breakdown(Vec<StrategyPerformanceRow>),
    /// 단일 전략 상세 통계
    Detailed(StatisticsSnapshot),
}

/// 일별 손익 포인트.
///
/// 거래가 있었던 날짜에만 생성됩니다. 거래가 없는 날짜는
/// 0으로 채우지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProfitPoint {
    /// 날짜 (UTC 기준 달력 날짜)
    pub date: NaiveDate,
    /// 해당 날짜의 확정 손익 합계
    pub profit: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = StatisticsSnapshot::empty();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_profit, Decimal::ZERO);
        assert_eq!(snapshot.win_rate_pct, Decimal::ZERO);
        assert_eq!(snapshot.sharpe_ratio, Decimal::ZERO);
        assert_eq!(snapshot.max_drawdown_pct, Decimal::ZERO);
    }

    #[test]
    fn test_snapshot_summary() {
        let snapshot = StatisticsSnapshot {
            total_trades: 5,
            win_rate_pct: dec!(60),
            total_profit: dec!(120.5),
            ..Default::default()
        };

        let summary = snapshot.summary();
        assert!(summary.contains("거래: 5"));
        assert!(summary.contains("승률: 60.0%"));
    }

    #[test]
    fn test_strategy_performance_serialization() {
        // Breakdown은 JSON 배열, Detailed는 JSON 객체로 직렬화된다
        let breakdown = StrategyPerformance::Breakdown(vec![StrategyPerformanceRow::new("grid")]);
        let json = serde_json::to_value(&breakdown).unwrap();
        assert!(json.is_array());

        let detailed = StrategyPerformance::Detailed(StatisticsSnapshot::empty());
        let json = serde_json::to_value(&detailed).unwrap();
        assert!(json.is_object());
    }
}
