//! 통계 조회 명령.
//!
//! 서비스 결과를 JSON으로 출력합니다. 출력 형식은 소비자가
//! 경계에서 선택하는 것이므로 엔진/서비스는 관여하지 않습니다.

use anyhow::Result;
use tracing::info;
use tradestat_analytics::StatsService;
use tradestat_core::StatisticsConfig;
use tradestat_data::{DatabaseConfig, TradeRepository};
use uuid::Uuid;

async fn service(
    db: &DatabaseConfig,
    statistics: StatisticsConfig,
) -> Result<StatsService<TradeRepository>> {
    let repo = TradeRepository::connect(db).await?;
    Ok(StatsService::new(repo, statistics))
}

/// 사용자 성과 통계를 출력합니다.
pub async fn stats(
    db: &DatabaseConfig,
    statistics: StatisticsConfig,
    user: &str,
    days: Option<i64>,
) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;

    let snapshot = service(db, statistics)
        .await?
        .user_statistics(user_id, days)
        .await?;

    info!(user_id = %user_id, "User statistics computed");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// 전략별 성과를 출력합니다.
pub async fn strategy(
    db: &DatabaseConfig,
    statistics: StatisticsConfig,
    user: Option<&str>,
    strategy: Option<&str>,
    days: Option<i64>,
) -> Result<()> {
    let user_id = user.map(Uuid::parse_str).transpose()?;

    let performance = service(db, statistics)
        .await?
        .strategy_performance(user_id, strategy, days)
        .await?;

    println!("{}", serde_json::to_string_pretty(&performance)?);
    Ok(())
}

/// 일별 손익 시계열을 출력합니다.
pub async fn daily(
    db: &DatabaseConfig,
    statistics: StatisticsConfig,
    user: &str,
    days: Option<i64>,
) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;

    let points = service(db, statistics)
        .await?
        .daily_profit_history(user_id, days)
        .await?;

    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(())
}

/// 승률이 기준에 미달하는 전략을 출력합니다.
pub async fn underperforming(
    db: &DatabaseConfig,
    statistics: StatisticsConfig,
    user: &str,
    days: Option<i64>,
) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;

    let rows = service(db, statistics)
        .await?
        .underperforming_strategies(user_id, days)
        .await?;

    if rows.is_empty() {
        println!("저조 전략 없음");
    } else {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }
    Ok(())
}
