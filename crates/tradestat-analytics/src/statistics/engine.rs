//! 성과 통계 계산 엔진.
//!
//! 청산 거래 목록으로부터 다양한 성과 지표를 계산합니다:
//! - 승률 (Win Rate): 수익 거래 비율
//! - 프로핏 팩터 (Profit Factor): 총 수익 / 총 손실 비율
//! - 샤프 비율 (Sharpe Ratio): 변동성 대비 수익률 측정
//! - 소르티노 비율 (Sortino Ratio): 하방 변동성 대비 수익률 측정
//! - 최대 낙폭 (Maximum Drawdown): 누적 손익 고점 대비 최대 하락폭
//! - 전략별 성과 집계 및 일별 손익 시계열
//!
//! 엔진은 상태가 없는 순수 계산이며, 입력이 비어 있어도 항상
//! 유한한 값으로 채워진 결과를 반환합니다. 유일한 에러는 0 이하의
//! 통계 기간(`InvalidWindow`)입니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use tradestat_analytics::StatisticsEngine;
//!
//! let engine = StatisticsEngine::new();
//! let snapshot = engine.user_statistics(&trades, 30)?;
//! println!("{}", snapshot.summary());
//! ```

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tradestat_core::{
    ClosedTrade, DailyProfitPoint, StatisticsSnapshot, StatsError, StatsResult,
    StrategyPerformance, StrategyPerformanceRow,
};
use uuid::Uuid;

/// 연간 거래일 수 (연율화 계산에 사용)
///
/// 암호화폐 시장은 연중무휴이므로 365일을 사용합니다.
/// 주식 시장(약 252일)에 적용하려면 이 값을 조정해야 합니다.
pub const ANNUALIZATION_DAYS: u32 = 365;

/// 성과 통계 계산 엔진.
///
/// 내부 상태가 없으므로 여러 호출자가 동시에 사용해도 안전합니다.
/// 각 거래를 하루치 수익 표본으로 취급하는 단순화된 모델을 사용하며,
/// 표준편차는 모집단 방식(N으로 나눔)입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// 새 엔진을 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 사용자 성과 스냅샷을 계산합니다.
    ///
    /// 입력은 호출자가 이미 기간으로 필터링한 청산 거래 목록이며,
    /// `closed_at` 오름차순이어야 합니다(낙폭 계산이 순서에 의존).
    /// 손익이 확정되지 않은 거래(`profit = None`)는 제외됩니다.
    ///
    /// 유효 거래가 하나도 없으면 표준 빈 스냅샷을 반환합니다.
    ///
    /// # Errors
    ///
    /// `window_days`가 0 이하이면 `InvalidWindow`를 반환합니다.
    pub fn user_statistics(
        &self,
        trades: &[ClosedTrade],
        window_days: i64,
    ) -> StatsResult<StatisticsSnapshot> {
        Self::validate_window(window_days)?;

        let profits: Vec<Decimal> = trades.iter().filter_map(|t| t.profit).collect();
        if profits.is_empty() {
            return Ok(StatisticsSnapshot::empty());
        }

        let total_trades = profits.len();
        let mut total_profit = Decimal::ZERO;
        let mut gross_profit = Decimal::ZERO;
        // 엄격한 음수 거래의 절대값 합 (프로핏 팩터 분모)
        let mut gross_loss = Decimal::ZERO;
        let mut winning_pnls: Vec<Decimal> = Vec::new();
        // 본전(손익 0) 거래는 손실로 분류하고 절대값 0으로 평균에 포함
        let mut losing_pnls: Vec<Decimal> = Vec::new();

        for &profit in &profits {
            total_profit += profit;

            if profit > Decimal::ZERO {
                gross_profit += profit;
                winning_pnls.push(profit);
            } else {
                losing_pnls.push(profit.abs());
                if profit < Decimal::ZERO {
                    gross_loss += profit.abs();
                }
            }
        }

        let winning_trades = winning_pnls.len();
        let losing_trades = losing_pnls.len();

        let win_rate_pct =
            Decimal::from(winning_trades) / Decimal::from(total_trades) * dec!(100);

        let avg_win = Self::mean(&winning_pnls);
        let avg_loss = Self::mean(&losing_pnls);

        // 손실이 전혀 없으면 무한대 대신 0으로 고정
        let profit_factor = if gross_loss > Decimal::ZERO {
            gross_profit / gross_loss
        } else {
            Decimal::ZERO
        };

        let sharpe_ratio = Self::sharpe_ratio(&profits);
        let sortino_ratio = Self::sortino_ratio(&profits);
        let max_drawdown_pct = Self::max_drawdown_pct(&profits);

        Ok(StatisticsSnapshot {
            total_profit,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate_pct,
            avg_win,
            avg_loss,
            profit_factor,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown_pct,
        })
    }

    /// 전략별 성과를 계산합니다.
    ///
    /// `strategy` 필터가 지정되면 해당 사용자+전략 범위의 상세
    /// 스냅샷을 반환합니다. 이때 `user_id`가 없으면 표준 빈 스냅샷을
    /// 반환합니다(전체 사용자에 걸친 단일 전략 상세는 지원하지 않음).
    ///
    /// 필터가 없으면 전략 이름으로 그룹화하여 총 손익 내림차순으로
    /// 정렬된 집계 목록을 반환합니다. 손익이 같은 전략은 처음 등장한
    /// 순서를 유지합니다.
    ///
    /// # Errors
    ///
    /// `window_days`가 0 이하이면 `InvalidWindow`를 반환합니다.
    pub fn strategy_performance(
        &self,
        trades: &[ClosedTrade],
        user_id: Option<Uuid>,
        strategy: Option<&str>,
        window_days: i64,
    ) -> StatsResult<StrategyPerformance> {
        Self::validate_window(window_days)?;

        let filtered: Vec<&ClosedTrade> = trades
            .iter()
            .filter(|t| user_id.map_or(true, |u| t.user_id == u))
            .filter(|t| strategy.map_or(true, |s| t.strategy == s))
            .collect();

        if strategy.is_some() {
            if user_id.is_none() {
                return Ok(StrategyPerformance::Detailed(StatisticsSnapshot::empty()));
            }

            let scoped: Vec<ClosedTrade> = filtered.into_iter().cloned().collect();
            let snapshot = self.user_statistics(&scoped, window_days)?;
            return Ok(StrategyPerformance::Detailed(snapshot));
        }

        // 전략 이름으로 그룹화. 처음 등장한 순서를 보존한다.
        let mut row_index: HashMap<&str, usize> = HashMap::new();
        let mut rows: Vec<StrategyPerformanceRow> = Vec::new();

        for trade in &filtered {
            let Some(profit) = trade.profit else {
                continue;
            };

            let index = *row_index.entry(trade.strategy.as_str()).or_insert_with(|| {
                rows.push(StrategyPerformanceRow::new(trade.strategy.clone()));
                rows.len() - 1
            });

            let row = &mut rows[index];
            row.total_profit += profit;
            row.trade_count += 1;
            if profit > Decimal::ZERO {
                row.winning_trades += 1;
            }
        }

        for row in &mut rows {
            if row.trade_count > 0 {
                row.win_rate_pct =
                    Decimal::from(row.winning_trades) / Decimal::from(row.trade_count) * dec!(100);
            }
        }

        // 안정 정렬이므로 손익이 같으면 등장 순서가 유지된다
        rows.sort_by(|a, b| b.total_profit.cmp(&a.total_profit));

        Ok(StrategyPerformance::Breakdown(rows))
    }

    /// 일별 손익 시계열을 계산합니다.
    ///
    /// 거래를 UTC 달력 날짜로 그룹화하여 거래가 있었던 날짜마다
    /// 손익 합계를 하나씩, 날짜 오름차순으로 반환합니다. 거래가
    /// 없는 날짜는 생성하지 않습니다.
    ///
    /// # Errors
    ///
    /// `window_days`가 0 이하이면 `InvalidWindow`를 반환합니다.
    pub fn daily_profit_history(
        &self,
        trades: &[ClosedTrade],
        window_days: i64,
    ) -> StatsResult<Vec<DailyProfitPoint>> {
        Self::validate_window(window_days)?;

        let mut daily: BTreeMap<chrono::NaiveDate, Decimal> = BTreeMap::new();

        for trade in trades {
            let Some(profit) = trade.profit else {
                continue;
            };

            *daily
                .entry(trade.closed_at.date_naive())
                .or_insert(Decimal::ZERO) += profit;
        }

        Ok(daily
            .into_iter()
            .map(|(date, profit)| DailyProfitPoint { date, profit })
            .collect())
    }

    /// 통계 기간을 검증합니다.
    fn validate_window(window_days: i64) -> StatsResult<()> {
        if window_days <= 0 {
            return Err(StatsError::InvalidWindow(window_days));
        }
        Ok(())
    }

    /// 산술 평균. 빈 목록이면 0입니다.
    fn mean(values: &[Decimal]) -> Decimal {
        if values.is_empty() {
            return Decimal::ZERO;
        }
        values.iter().copied().sum::<Decimal>() / Decimal::from(values.len())
    }

    /// 모집단 표준편차 (N으로 나눔).
    ///
    /// 표본 방식(N-1)이 아닌 모집단 방식을 사용합니다. 방식에 따라
    /// 샤프/소르티노 값이 달라지므로 의도적으로 고정한 규약입니다.
    fn population_std_dev(values: &[Decimal]) -> Decimal {
        if values.is_empty() {
            return Decimal::ZERO;
        }

        let mean = Self::mean(values);
        let variance = values
            .iter()
            .map(|v| {
                let diff = *v - mean;
                diff * diff
            })
            .sum::<Decimal>()
            / Decimal::from(values.len());

        Self::decimal_sqrt(variance)
    }

    /// 샤프 비율.
    ///
    /// 각 거래 손익을 하루치 수익 표본으로 취급하는 단순화 모델:
    /// 평균 손익 / 모집단 표준편차 × √365.
    /// 표준편차가 0이면 0을 반환합니다.
    fn sharpe_ratio(profits: &[Decimal]) -> Decimal {
        let std_dev = Self::population_std_dev(profits);
        if std_dev.is_zero() {
            return Decimal::ZERO;
        }

        (Self::mean(profits) / std_dev) * Self::annualization_factor()
    }

    /// 소르티노 비율.
    ///
    /// 위험 항을 음수 손익의 모집단 표준편차로 제한합니다:
    /// 평균 손익(전체) / 모집단 표준편차(손익 < 0) × √365.
    /// 음수 손익이 없거나 하방 표준편차가 0이면 0을 반환합니다.
    fn sortino_ratio(profits: &[Decimal]) -> Decimal {
        let downside: Vec<Decimal> = profits
            .iter()
            .copied()
            .filter(|p| *p < Decimal::ZERO)
            .collect();

        if downside.is_empty() {
            return Decimal::ZERO;
        }

        let downside_dev = Self::population_std_dev(&downside);
        if downside_dev.is_zero() {
            return Decimal::ZERO;
        }

        (Self::mean(profits) / downside_dev) * Self::annualization_factor()
    }

    /// 최대 낙폭 (백분율).
    ///
    /// 손익을 입력 순서대로 누적하며 고점을 추적합니다. 고점은 첫
    /// 누적값으로 초기화되고, 각 단계의 낙폭은 고점이 양수일 때
    /// (고점 - 누적) / 고점입니다. 고점이 0 이하인 구간의 낙폭은
    /// 0으로 정의합니다(음수 고점 나눗셈 방지).
    fn max_drawdown_pct(profits: &[Decimal]) -> Decimal {
        let mut cumulative = Decimal::ZERO;
        let mut peak: Option<Decimal> = None;
        let mut max_drawdown = Decimal::ZERO;

        for &profit in profits {
            cumulative += profit;

            let current_peak = peak.get_or_insert(cumulative);
            if cumulative > *current_peak {
                *current_peak = cumulative;
            }

            if *current_peak > Decimal::ZERO {
                let drawdown = (*current_peak - cumulative) / *current_peak;
                if drawdown > max_drawdown {
                    max_drawdown = drawdown;
                }
            }
        }

        max_drawdown * dec!(100)
    }

    /// 연율화 계수 √365.
    fn annualization_factor() -> Decimal {
        Self::decimal_sqrt(Decimal::from(ANNUALIZATION_DAYS))
    }

    /// Decimal 타입의 제곱근을 뉴턴 방법으로 계산합니다.
    ///
    /// 초기 추정값 value/2에서 시작하여 next = (guess + value/guess) / 2
    /// 를 수렴할 때까지 반복합니다 (최대 50회, 정밀도 10^-10).
    fn decimal_sqrt(value: Decimal) -> Decimal {
        if value <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut guess = value / Decimal::TWO;
        if guess.is_zero() {
            guess = value;
        }
        let precision = Decimal::new(1, 10);

        for _ in 0..50 {
            let next_guess = (guess + value / guess) / Decimal::TWO;
            if (next_guess - guess).abs() < precision {
                return next_guess;
            }
            guess = next_guess;
        }

        guess
    }
}
