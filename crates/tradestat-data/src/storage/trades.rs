//! 청산 거래 repository.
//!
//! `closed_trades` 테이블에 대한 조회/기록을 제공합니다.
//! 기간 조회는 항상 `closed_at` 오름차순으로 반환되며, 이는
//! 낙폭 계산의 거래 순서 의미론이 의존하는 계약입니다.

use crate::error::Result;
use crate::storage::postgres::{self, DatabaseConfig};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use tradestat_core::{ClosedTrade, StatsResult, TradeRecordStore};
use uuid::Uuid;

/// 청산 거래 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct ClosedTradeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub strategy: String,
    pub symbol: String,
    pub profit: Option<Decimal>,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub quantity: Decimal,
    pub closed_at: DateTime<Utc>,
}

impl From<ClosedTradeRecord> for ClosedTrade {
    fn from(record: ClosedTradeRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            strategy: record.strategy,
            symbol: record.symbol,
            profit: record.profit,
            entry_price: record.entry_price,
            exit_price: record.exit_price,
            quantity: record.quantity,
            closed_at: record.closed_at,
        }
    }
}

/// 청산 거래 repository.
pub struct TradeRepository {
    pool: PgPool,
}

impl TradeRepository {
    /// 기존 풀을 공유하는 repository를 생성합니다.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 설정으로 풀을 구성하여 repository를 생성합니다.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(postgres::connect(config).await?))
    }

    /// 청산 거래를 기록합니다.
    ///
    /// 체결 서브시스템의 기록 경로입니다. 동일 ID의 중복 기록은
    /// `DuplicateError`로 거부됩니다.
    #[instrument(skip(self, trade), fields(trade_id = %trade.id, user_id = %trade.user_id))]
    pub async fn insert(&self, trade: &ClosedTrade) -> Result<()> {
        sqlx::query(
            "INSERT INTO closed_trades
                 (id, user_id, strategy, symbol, profit,
                  entry_price, exit_price, quantity, closed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(trade.id)
        .bind(trade.user_id)
        .bind(&trade.strategy)
        .bind(&trade.symbol)
        .bind(trade.profit)
        .bind(trade.entry_price)
        .bind(trade.exit_price)
        .bind(trade.quantity)
        .bind(trade.closed_at)
        .execute(&self.pool)
        .await?;

        debug!("Closed trade recorded");
        Ok(())
    }

    /// 사용자의 청산 거래를 기간으로 조회합니다.
    ///
    /// 기간 경계는 양끝 포함이며 `closed_at` 오름차순으로 반환됩니다.
    #[instrument(skip(self))]
    pub async fn closed_trades_in_window(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ClosedTrade>> {
        let records: Vec<ClosedTradeRecord> = sqlx::query_as(
            "SELECT id, user_id, strategy, symbol, profit,
                    entry_price, exit_price, quantity, closed_at
             FROM closed_trades
             WHERE user_id = $1 AND closed_at >= $2 AND closed_at <= $3
             ORDER BY closed_at ASC",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = records.len(), "Closed trades fetched");
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// 사용자/전략 필터를 선택적으로 적용하여 청산 거래를 조회합니다.
    #[instrument(skip(self))]
    pub async fn closed_trades_with_filters(
        &self,
        user_id: Option<Uuid>,
        strategy: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ClosedTrade>> {
        let records: Vec<ClosedTradeRecord> = sqlx::query_as(
            "SELECT id, user_id, strategy, symbol, profit,
                    entry_price, exit_price, quantity, closed_at
             FROM closed_trades
             WHERE ($1::uuid IS NULL OR user_id = $1)
               AND ($2::text IS NULL OR strategy = $2)
               AND closed_at >= $3 AND closed_at <= $4
             ORDER BY closed_at ASC",
        )
        .bind(user_id)
        .bind(strategy)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = records.len(), "Filtered closed trades fetched");
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// 사용자의 청산 거래 수를 반환합니다.
    #[instrument(skip(self))]
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM closed_trades WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

/// 통계 서비스가 사용하는 저장소 구현.
///
/// 저장소 오류는 `StatsError`로 변환되어 그대로 전파됩니다.
/// 오류를 빈 목록으로 바꾸지 않습니다.
#[async_trait]
impl TradeRecordStore for TradeRepository {
    async fn closed_trades(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatsResult<Vec<ClosedTrade>> {
        Ok(self.closed_trades_in_window(user_id, start, end).await?)
    }

    async fn closed_trades_filtered(
        &self,
        user_id: Option<Uuid>,
        strategy: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatsResult<Vec<ClosedTrade>> {
        Ok(self
            .closed_trades_with_filters(user_id, strategy, start, end)
            .await?)
    }
}
