//! 사용자 설정 명령.

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use tracing::info;
use tradestat_core::{RiskLevel, TradingMode};
use tradestat_data::{DatabaseConfig, UserSettingsRepository};
use uuid::Uuid;

/// 사용자 설정을 출력합니다.
pub async fn show(db: &DatabaseConfig, user: &str) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;
    let repo = UserSettingsRepository::connect(db).await?;

    let settings = repo.get_or_default(user_id).await?;
    let pairs = repo.pairs(user_id).await?;
    let strategies = repo.strategies(user_id).await?;

    let output = serde_json::json!({
        "settings": settings,
        "pairs": pairs,
        "strategies": strategies,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// 거래 모드를 변경합니다.
pub async fn set_mode(db: &DatabaseConfig, user: &str, mode: &str) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;
    let mode: TradingMode = mode.parse().map_err(|e: String| anyhow!(e))?;

    UserSettingsRepository::connect(db)
        .await?
        .set_trading_mode(user_id, mode)
        .await?;

    info!(%user_id, %mode, "Trading mode updated");
    println!("거래 모드 변경 완료: {}", mode);
    Ok(())
}

/// 리스크 수준을 변경합니다.
pub async fn set_risk(db: &DatabaseConfig, user: &str, level: &str) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;
    let level: RiskLevel = level.parse().map_err(|e: String| anyhow!(e))?;

    UserSettingsRepository::connect(db)
        .await?
        .set_risk_level(user_id, level)
        .await?;

    info!(%user_id, %level, "Risk level updated");
    println!("리스크 수준 변경 완료: {}", level);
    Ok(())
}

/// 거래 일시중지 상태를 변경합니다.
pub async fn set_paused(db: &DatabaseConfig, user: &str, is_paused: bool) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;

    UserSettingsRepository::connect(db)
        .await?
        .set_paused_state(user_id, is_paused)
        .await?;

    if is_paused {
        println!("거래 일시중지 완료");
    } else {
        println!("거래 재개 완료");
    }
    Ok(())
}

/// 포지션 한도를 변경합니다.
///
/// 포지션 크기는 포트폴리오 대비 비율(0.1 = 10%)이며, 지정하지 않은
/// 한도는 기존 값을 유지합니다.
pub async fn set_limits(
    db: &DatabaseConfig,
    user: &str,
    max_positions: Option<i32>,
    max_size: Option<Decimal>,
) -> Result<()> {
    if max_positions.is_none() && max_size.is_none() {
        return Err(anyhow!("변경할 한도를 하나 이상 지정해야 합니다"));
    }

    let user_id = Uuid::parse_str(user)?;

    UserSettingsRepository::connect(db)
        .await?
        .update_position_limits(user_id, max_positions, max_size)
        .await?;

    info!(%user_id, "Position limits updated");
    println!("포지션 한도 변경 완료");
    Ok(())
}

/// 거래쌍 활성화 여부를 변경합니다.
pub async fn set_pair(db: &DatabaseConfig, user: &str, symbol: &str, enabled: bool) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;

    UserSettingsRepository::connect(db)
        .await?
        .set_pair_enabled(user_id, symbol, enabled)
        .await?;

    println!(
        "거래쌍 {} {}",
        symbol,
        if enabled { "활성화" } else { "비활성화" }
    );
    Ok(())
}

/// 전략 활성화 여부를 변경합니다.
pub async fn set_strategy(
    db: &DatabaseConfig,
    user: &str,
    strategy: &str,
    enabled: bool,
) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;

    UserSettingsRepository::connect(db)
        .await?
        .set_strategy_enabled(user_id, strategy, enabled)
        .await?;

    println!(
        "전략 {} {}",
        strategy,
        if enabled { "활성화" } else { "비활성화" }
    );
    Ok(())
}
