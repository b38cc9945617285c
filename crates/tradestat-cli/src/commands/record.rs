//! 청산 거래 수동 기록 명령.
//!
//! 운영 중 보정이나 테스트 데이터 주입에 사용합니다. 실제 거래
//! 기록은 체결 서브시스템이 담당합니다.

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::info;
use tradestat_core::ClosedTrade;
use tradestat_data::{DatabaseConfig, TradeRepository};
use uuid::Uuid;

/// 청산 거래 하나를 기록합니다.
pub async fn record(
    db: &DatabaseConfig,
    user: &str,
    strategy: &str,
    symbol: &str,
    entry_price: Decimal,
    exit_price: Decimal,
    quantity: Decimal,
    profit: Option<Decimal>,
) -> Result<()> {
    let user_id = Uuid::parse_str(user)?;

    let mut trade = ClosedTrade::new(user_id, strategy, symbol, entry_price, exit_price, quantity);
    if let Some(profit) = profit {
        trade = trade.with_profit(profit);
    }

    let repo = TradeRepository::connect(db).await?;
    repo.insert(&trade).await?;

    let total = repo.count_for_user(user_id).await?;

    info!(trade_id = %trade.id, %user_id, "Closed trade recorded");
    println!("거래 기록 완료: {}", trade.id);
    println!("사용자 총 거래 수: {}", total);
    Ok(())
}
