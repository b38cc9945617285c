//! StatsService 통합 테스트
//!
//! TradeRecordStore trait 구현을 통해 서비스 전체 경로를 검증하는 예시

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal_macros::dec;
use tradestat_analytics::StatsService;
use tradestat_core::{
    ClosedTrade, StatisticsConfig, StatsResult, StrategyPerformance, TradeRecordStore,
};
use uuid::Uuid;

/// 테스트용 저장소 구현.
///
/// 실제 Postgres 저장소와 동일한 계약을 지킨다:
/// 기간 양끝 포함, `closed_at` 오름차순 정렬.
struct TestStore {
    trades: Vec<ClosedTrade>,
}

#[async_trait]
impl TradeRecordStore for TestStore {
    async fn closed_trades(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatsResult<Vec<ClosedTrade>> {
        self.closed_trades_filtered(Some(user_id), None, start, end)
            .await
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

fn trade(
    user_id: Uuid,
    strategy: &str,
    profit: rust_decimal::Decimal,
    hours_ago: i64,
) -> ClosedTrade {
    ClosedTrade::new(user_id, strategy, "BTC/USDT", dec!(50000), dec!(50100), dec!(0.1))
        .with_profit(profit)
        .with_closed_at(Utc::now() - Duration::hours(hours_ago))
}

#[tokio::test]
async fn test_full_statistics_path() {
    let user_id = Uuid::new_v4();
    let other_user = Uuid::new_v4();

    let store = TestStore {
        trades: vec![
            trade(user_id, "grid_trading", dec!(10), 72),
            trade(user_id, "grid_trading", dec!(-20), 48),
            trade(user_id, "scalping", dec!(5), 24),
            // 다른 사용자의 거래는 제외되어야 한다
            trade(other_user, "grid_trading", dec!(1000), 24),
        ],
    };
    let service = StatsService::new(store, StatisticsConfig::default());

    let snapshot = service.user_statistics(user_id, Some(30)).await.unwrap();

    assert_eq!(snapshot.total_trades, 3);
    assert_eq!(snapshot.total_profit, dec!(-5));
    assert_eq!(snapshot.winning_trades, 2);
    assert_eq!(snapshot.losing_trades, 1);
    // 누적: 10, -10, -5 → 최대 낙폭 200%
    assert_eq!(snapshot.max_drawdown_pct, dec!(200));
}

#[tokio::test]
async fn test_strategy_breakdown_path() {
    let user_id = Uuid::new_v4();

    let store = TestStore {
        trades: vec![
            trade(user_id, "grid_trading", dec!(30), 72),
            trade(user_id, "scalping", dec!(5), 48),
            trade(user_id, "scalping", dec!(-2), 24),
        ],
    };
    let service = StatsService::new(store, StatisticsConfig::default());

    let result = service
        .strategy_performance(Some(user_id), None, Some(30))
        .await
        .unwrap();

    let StrategyPerformance::Breakdown(rows) = result else {
        panic!("expected breakdown");
    };

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].strategy_name, "grid_trading");
    assert_eq!(rows[1].strategy_name, "scalping");
    assert_eq!(rows[1].trade_count, 2);
}

#[tokio::test]
async fn test_detailed_strategy_path() {
    let user_id = Uuid::new_v4();

    let store = TestStore {
        trades: vec![
            trade(user_id, "grid_trading", dec!(30), 72),
            trade(user_id, "scalping", dec!(5), 48),
        ],
    };
    let service = StatsService::new(store, StatisticsConfig::default());

    let result = service
        .strategy_performance(Some(user_id), Some("grid_trading"), Some(30))
        .await
        .unwrap();

    let StrategyPerformance::Detailed(snapshot) = result else {
        panic!("expected detailed snapshot");
    };

    assert_eq!(snapshot.total_trades, 1);
    assert_eq!(snapshot.total_profit, dec!(30));
}

#[tokio::test]
async fn test_strategy_filter_without_user_is_empty_snapshot() {
    let user_id = Uuid::new_v4();

    let store = TestStore {
        trades: vec![trade(user_id, "grid_trading", dec!(30), 24)],
    };
    let service = StatsService::new(store, StatisticsConfig::default());

    let result = service
        .strategy_performance(None, Some("grid_trading"), Some(30))
        .await
        .unwrap();

    let StrategyPerformance::Detailed(snapshot) = result else {
        panic!("expected detailed snapshot");
    };
    assert!(snapshot.is_empty());
}

#[tokio::test]
async fn test_daily_history_path() {
    let user_id = Uuid::new_v4();

    let store = TestStore {
        trades: vec![
            // 같은 시각의 두 거래는 같은 날짜로 합산되고,
            // 28시간 이상 떨어진 거래는 반드시 다른 날짜가 된다
            trade(user_id, "grid_trading", dec!(10), 30),
            trade(user_id, "grid_trading", dec!(-3), 30),
            trade(user_id, "scalping", dec!(7), 2),
        ],
    };
    let service = StatsService::new(store, StatisticsConfig::default());

    let points = service
        .daily_profit_history(user_id, Some(30))
        .await
        .unwrap();

    // 거래가 있었던 날짜만 생성된다
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].profit, dec!(7));
    assert_eq!(points[1].profit, dec!(7));
    // 날짜 오름차순
    assert!(points[0].date < points[1].date);
}
