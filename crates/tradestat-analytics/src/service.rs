//! 통계 서비스 계층.
//!
//! 저장소 조회와 엔진 계산을 연결합니다. 통계 윈도우의 기본값
//! 적용, 조회 기간 산출, 결과 로깅을 담당하며 계산 자체는 전부
//! `StatisticsEngine`에 위임합니다.
//!
//! 저장소 오류는 항상 호출자에게 전파됩니다. 오류를 빈 거래
//! 목록으로 바꾸면 "조회 실패"가 "거래 없음"으로 기록되어
//! 통계가 오염되므로, 이 변환은 금지되어 있습니다.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument, warn, Instrument};
use tradestat_core::{
    stats_span, DailyProfitPoint, StatisticsConfig, StatisticsSnapshot, StatsError, StatsResult,
    StrategyPerformance, StrategyPerformanceRow, TradeRecordStore,
};
use uuid::Uuid;

use crate::statistics::StatisticsEngine;

/// 통계 서비스.
///
/// 저장소 핸들과 설정만 보유하며 가변 상태가 없으므로 여러
/// 태스크에서 동시에 호출해도 안전합니다.
pub struct StatsService<S> {
    store: S,
    config: StatisticsConfig,
    engine: StatisticsEngine,
}

impl<S: TradeRecordStore> StatsService<S> {
    /// 새 서비스를 생성합니다.
    pub fn new(store: S, config: StatisticsConfig) -> Self {
        Self {
            store,
            config,
            engine: StatisticsEngine::new(),
        }
    }

    /// 통계 윈도우를 확정하고 조회 기간을 계산합니다.
    ///
    /// `window_days`가 `None`이면 설정의 기본값을 사용합니다.
    fn resolve_window(
        &self,
        window_days: Option<i64>,
    ) -> StatsResult<(i64, DateTime<Utc>, DateTime<Utc>)> {
        let days = window_days.unwrap_or(self.config.default_window_days);
        if days <= 0 {
            return Err(StatsError::InvalidWindow(days));
        }

        let end = Utc::now();
        let start = end - Duration::days(days);
        Ok((days, start, end))
    }

    /// 사용자 성과 스냅샷을 조회합니다.
    #[instrument(skip(self))]
    pub async fn user_statistics(
        &self,
        user_id: Uuid,
        window_days: Option<i64>,
    ) -> StatsResult<StatisticsSnapshot> {
        let (days, start, end) = self.resolve_window(window_days)?;

        // 저장소 오류는 여기서 그대로 전파된다
        let trades = self.store.closed_trades(user_id, start, end).await?;
        debug!(count = trades.len(), days, "Closed trades loaded");

        let snapshot = self.engine.user_statistics(&trades, days)?;
        debug!(summary = %snapshot.summary(), "User statistics computed");
        Ok(snapshot)
    }

    /// 전략별 성과를 조회합니다.
    ///
    /// `strategy`가 지정되면 해당 사용자+전략의 상세 스냅샷,
    /// 지정되지 않으면 전략별 집계 목록을 반환합니다.
    #[instrument(skip(self))]
    pub async fn strategy_performance(
        &self,
        user_id: Option<Uuid>,
        strategy: Option<&str>,
        window_days: Option<i64>,
    ) -> StatsResult<StrategyPerformance> {
        let (days, start, end) = self.resolve_window(window_days)?;

        let trades = self
            .store
            .closed_trades_filtered(user_id, strategy, start, end)
            .await?;
        debug!(count = trades.len(), days, "Filtered closed trades loaded");

        self.engine
            .strategy_performance(&trades, user_id, strategy, days)
    }

    /// 일별 손익 시계열을 조회합니다.
    #[instrument(skip(self))]
    pub async fn daily_profit_history(
        &self,
        user_id: Uuid,
        window_days: Option<i64>,
    ) -> StatsResult<Vec<DailyProfitPoint>> {
        let (days, start, end) = self.resolve_window(window_days)?;

        let trades = self.store.closed_trades(user_id, start, end).await?;
        self.engine.daily_profit_history(&trades, days)
    }

    /// 승률이 기준에 미달하는 전략을 찾습니다.
    ///
    /// 설정의 `min_win_rate_pct` 미만인 전략별 집계 행을 반환하며
    /// 전략마다 경고 로그를 남깁니다. 조회 전용이며 전략을
    /// 중지시키지는 않습니다.
    pub async fn underperforming_strategies(
        &self,
        user_id: Uuid,
        window_days: Option<i64>,
    ) -> StatsResult<Vec<StrategyPerformanceRow>> {
        let span = stats_span!("underperforming_strategies", user_id);

        async {
            let performance = self
                .strategy_performance(Some(user_id), None, window_days)
                .await?;

            let StrategyPerformance::Breakdown(rows) = performance else {
                // 전략 필터 없이 호출했으므로 항상 집계 목록이다
                return Err(StatsError::Internal(
                    "strategy breakdown expected".to_string(),
                ));
            };

            let threshold = self.config.min_win_rate_pct;
            let flagged: Vec<StrategyPerformanceRow> = rows
                .into_iter()
                .filter(|row| row.win_rate_pct < threshold)
                .collect();

            for row in &flagged {
                warn!(
                    strategy = %row.strategy_name,
                    win_rate_pct = %row.win_rate_pct,
                    threshold = %threshold,
                    "Strategy win rate below threshold"
                );
            }

            Ok(flagged)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use tradestat_core::ClosedTrade;

    /// 테스트용 인메모리 저장소.
    struct InMemoryStore {
        trades: Vec<ClosedTrade>,
    }

    #[async_trait]
    impl TradeRecordStore for InMemoryStore {
        async fn closed_trades(
            &self,
            user_id: Uuid,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> StatsResult<Vec<ClosedTrade>> {
            let mut rows: Vec<ClosedTrade> = self
                .trades
                .iter()
                .filter(|t| t.user_id == user_id && t.closed_at >= start && t.closed_at <= end)
                .cloned()
                .collect();
            rows.sort_by_key(|t| t.closed_at);
            Ok(rows)
        }

        async fn closed_trades_filtered(
            &self,
            user_id: Option<Uuid>,
            strategy: Option<&str>,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> StatsResult<Vec<ClosedTrade>> {
            let mut rows: Vec<ClosedTrade> = self
                .trades
                .iter()
                .filter(|t| user_id.map_or(true, |u| t.user_id == u))
                .filter(|t| strategy.map_or(true, |s| t.strategy == s))
                .filter(|t| t.closed_at >= start && t.closed_at <= end)
                .cloned()
                .collect();
            rows.sort_by_key(|t| t.closed_at);
            Ok(rows)
        }
    }

    /// 항상 실패하는 저장소.
    struct FailingStore;

    #[async_trait]
    impl TradeRecordStore for FailingStore {
        async fn closed_trades(
            &self,
            _user_id: Uuid,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> StatsResult<Vec<ClosedTrade>> {
            Err(StatsError::Database("connection refused".to_string()))
        }

        async fn closed_trades_filtered(
            &self,
            _user_id: Option<Uuid>,
            _strategy: Option<&str>,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> StatsResult<Vec<ClosedTrade>> {
            Err(StatsError::Database("connection refused".to_string()))
        }
    }

    fn recent_trade(user_id: Uuid, strategy: &str, profit: rust_decimal::Decimal) -> ClosedTrade {
        ClosedTrade::new(user_id, strategy, "BTC/USDT", dec!(100), dec!(101), dec!(1))
            .with_profit(profit)
            .with_closed_at(Utc::now() - Duration::hours(1))
    }

    #[tokio::test]
    async fn test_user_statistics_with_default_window() {
        let user_id = Uuid::new_v4();
        let store = InMemoryStore {
            trades: vec![
                recent_trade(user_id, "grid", dec!(10)),
                recent_trade(user_id, "grid", dec!(-4)),
            ],
        };
        let service = StatsService::new(store, StatisticsConfig::default());

        let snapshot = service.user_statistics(user_id, None).await.unwrap();

        assert_eq!(snapshot.total_trades, 2);
        assert_eq!(snapshot.total_profit, dec!(6));
    }

    #[tokio::test]
    async fn test_old_trades_outside_window_excluded() {
        let user_id = Uuid::new_v4();
        let store = InMemoryStore {
            trades: vec![
                recent_trade(user_id, "grid", dec!(10)),
                recent_trade(user_id, "grid", dec!(5))
                    .with_closed_at(Utc::now() - Duration::days(90)),
            ],
        };
        let service = StatsService::new(store, StatisticsConfig::default());

        let snapshot = service.user_statistics(user_id, Some(30)).await.unwrap();
        assert_eq!(snapshot.total_trades, 1);
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        // 저장소 오류가 빈 스냅샷으로 둔갑하면 안 된다
        let service = StatsService::new(FailingStore, StatisticsConfig::default());

        let result = service.user_statistics(Uuid::new_v4(), None).await;
        assert!(matches!(result, Err(StatsError::Database(_))));

        let result = service.strategy_performance(None, None, None).await;
        assert!(matches!(result, Err(StatsError::Database(_))));

        let result = service.daily_profit_history(Uuid::new_v4(), None).await;
        assert!(matches!(result, Err(StatsError::Database(_))));
    }

    #[tokio::test]
    async fn test_invalid_window_rejected_before_query() {
        // 기간 검증은 저장소 접근보다 먼저 일어난다
        let service = StatsService::new(FailingStore, StatisticsConfig::default());

        let result = service.user_statistics(Uuid::new_v4(), Some(0)).await;
        assert!(matches!(result, Err(StatsError::InvalidWindow(0))));
    }

    #[tokio::test]
    async fn test_underperforming_strategies_flagged() {
        let user_id = Uuid::new_v4();
        let store = InMemoryStore {
            trades: vec![
                // grid: 2승 0패 → 100%
                recent_trade(user_id, "grid", dec!(10)),
                recent_trade(user_id, "grid", dec!(8)),
                // scalping: 0승 2패 → 0%
                recent_trade(user_id, "scalping", dec!(-3)),
                recent_trade(user_id, "scalping", dec!(-5)),
            ],
        };
        let service = StatsService::new(store, StatisticsConfig::default());

        let flagged = service
            .underperforming_strategies(user_id, None)
            .await
            .unwrap();

        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].strategy_name, "scalping");
    }
}
