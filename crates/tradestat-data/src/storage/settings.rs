//! 사용자 트레이딩 설정 repository.
//!
//! `user_trading_settings`, `user_pairs`, `user_strategies` 테이블에
//! 대한 CRUD를 제공합니다. 설정 저장은 모두 upsert 방식이며, 저장된
//! 설정이 없는 사용자는 기본값으로 조회됩니다.

use crate::error::{DataError, Result};
use crate::storage::postgres::{self, DatabaseConfig};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use tradestat_core::{PairSetting, RiskLevel, StrategySetting, TradingMode, UserTradingSettings};
use uuid::Uuid;

/// 사용자 설정 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
struct UserSettingsRecord {
    user_id: Uuid,
    trading_mode: String,
    risk_level: String,
    is_paused: bool,
    max_open_positions: i32,
    max_position_size: Decimal,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserSettingsRecord> for UserTradingSettings {
    type Error = DataError;

    fn try_from(record: UserSettingsRecord) -> Result<Self> {
        let trading_mode = record
            .trading_mode
            .parse::<TradingMode>()
            .map_err(DataError::InvalidData)?;
        let risk_level = record
            .risk_level
            .parse::<RiskLevel>()
            .map_err(DataError::InvalidData)?;

        Ok(Self {
            user_id: record.user_id,
            trading_mode,
            risk_level,
            is_paused: record.is_paused,
            max_open_positions: record.max_open_positions,
            max_position_size: record.max_position_size,
            updated_at: record.updated_at,
        })
    }
}

/// 사용자 트레이딩 설정 repository.
pub struct UserSettingsRepository {
    pool: PgPool,
}

impl UserSettingsRepository {
    /// 기존 풀을 공유하는 repository를 생성합니다.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 설정으로 풀을 구성하여 repository를 생성합니다.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(postgres::connect(config).await?))
    }

    /// 사용자 설정을 조회합니다.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid) -> Result<Option<UserTradingSettings>> {
        let record: Option<UserSettingsRecord> = sqlx::query_as(
            "SELECT user_id, trading_mode, risk_level, is_paused,
                    max_open_positions, max_position_size, updated_at
             FROM user_trading_settings
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(TryInto::try_into).transpose()
    }

    /// 사용자 설정을 조회하고, 없으면 기본값을 반환합니다.
    pub async fn get_or_default(&self, user_id: Uuid) -> Result<UserTradingSettings> {
        Ok(self
            .get(user_id)
            .await?
            .unwrap_or_else(|| UserTradingSettings::default_for(user_id)))
    }

    /// 거래 모드를 설정합니다.
    #[instrument(skip(self))]
    pub async fn set_trading_mode(&self, user_id: Uuid, mode: TradingMode) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_trading_settings (user_id, trading_mode)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET
                 trading_mode = EXCLUDED.trading_mode,
                 updated_at = NOW()",
        )
        .bind(user_id)
        .bind(mode.to_string())
        .execute(&self.pool)
        .await?;

        debug!(%mode, "Trading mode updated");
        Ok(())
    }

    /// 리스크 수준을 설정합니다.
    #[instrument(skip(self))]
    pub async fn set_risk_level(&self, user_id: Uuid, level: RiskLevel) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_trading_settings (user_id, risk_level)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET
                 risk_level = EXCLUDED.risk_level,
                 updated_at = NOW()",
        )
        .bind(user_id)
        .bind(level.to_string())
        .execute(&self.pool)
        .await?;

        debug!(%level, "Risk level updated");
        Ok(())
    }

    /// 거래 일시중지 상태를 설정합니다.
    #[instrument(skip(self))]
    pub async fn set_paused_state(&self, user_id: Uuid, is_paused: bool) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_trading_settings (user_id, is_paused)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET
                 is_paused = EXCLUDED.is_paused,
                 updated_at = NOW()",
        )
        .bind(user_id)
        .bind(is_paused)
        .execute(&self.pool)
        .await?;

        debug!(is_paused, "Paused state updated");
        Ok(())
    }

    /// 포지션 한도를 부분 갱신합니다.
    ///
    /// `None`으로 전달된 필드는 기존 값을 유지합니다.
    #[instrument(skip(self))]
    pub async fn update_position_limits(
        &self,
        user_id: Uuid,
        max_open_positions: Option<i32>,
        max_position_size: Option<Decimal>,
    ) -> Result<()> {
        // 행이 없으면 기본값으로 먼저 생성
        sqlx::query(
            "INSERT INTO user_trading_settings (user_id)
             VALUES ($1)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "UPDATE user_trading_settings SET
                 max_open_positions = COALESCE($2, max_open_positions),
                 max_position_size = COALESCE($3, max_position_size),
                 updated_at = NOW()
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(max_open_positions)
        .bind(max_position_size)
        .execute(&self.pool)
        .await?;

        debug!("Position limits updated");
        Ok(())
    }

    /// 거래쌍 활성화 여부를 설정합니다.
    #[instrument(skip(self))]
    pub async fn set_pair_enabled(&self, user_id: Uuid, symbol: &str, enabled: bool) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_pairs (user_id, symbol, enabled)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, symbol) DO UPDATE SET
                 enabled = EXCLUDED.enabled,
                 updated_at = NOW()",
        )
        .bind(user_id)
        .bind(symbol)
        .bind(enabled)
        .execute(&self.pool)
        .await?;

        debug!(symbol, enabled, "Pair setting updated");
        Ok(())
    }

    /// 사용자의 거래쌍 설정 목록을 반환합니다.
    #[instrument(skip(self))]
    pub async fn pairs(&self, user_id: Uuid) -> Result<Vec<PairSetting>> {
        let rows: Vec<(String, bool)> = sqlx::query_as(
            "SELECT symbol, enabled FROM user_pairs
             WHERE user_id = $1
             ORDER BY symbol ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(symbol, enabled)| PairSetting { symbol, enabled })
            .collect())
    }

    /// 활성화된 거래쌍 심볼 목록을 반환합니다.
    pub async fn enabled_pairs(&self, user_id: Uuid) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT symbol FROM user_pairs
             WHERE user_id = $1 AND enabled = TRUE
             ORDER BY symbol ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(symbol,)| symbol).collect())
    }

    /// 전략 활성화 여부를 설정합니다.
    #[instrument(skip(self))]
    pub async fn set_strategy_enabled(
        &self,
        user_id: Uuid,
        strategy: &str,
        enabled: bool,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_strategies (user_id, strategy, enabled)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, strategy) DO UPDATE SET
                 enabled = EXCLUDED.enabled,
                 updated_at = NOW()",
        )
        .bind(user_id)
        .bind(strategy)
        .bind(enabled)
        .execute(&self.pool)
        .await?;

        debug!(strategy, enabled, "Strategy setting updated");
        Ok(())
    }

    /// 사용자의 전략 설정 목록을 반환합니다.
    #[instrument(skip(self))]
    pub async fn strategies(&self, user_id: Uuid) -> Result<Vec<StrategySetting>> {
        let rows: Vec<(String, bool)> = sqlx::query_as(
            "SELECT strategy, enabled FROM user_strategies
             WHERE user_id = $1
             ORDER BY strategy ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(strategy, enabled)| StrategySetting { strategy, enabled })
            .collect())
    }

    /// 활성화된 전략 이름 목록을 반환합니다.
    pub async fn enabled_strategies(&self, user_id: Uuid) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT strategy FROM user_strategies
             WHERE user_id = $1 AND enabled = TRUE
             ORDER BY strategy ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(strategy,)| strategy).collect())
    }
}
