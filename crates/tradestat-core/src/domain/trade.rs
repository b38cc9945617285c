//! 청산 완료 거래 기록.
//!
//! 포지션이 완전히 종료되어 손익이 확정된 거래를 나타냅니다.
//! 체결 서브시스템이 생성하며, 통계 엔진은 읽기 전용으로 소비합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 청산 완료된 거래.
///
/// 청산 이후에는 불변입니다. `profit`이 `None`이면 손익이 아직
/// 확정되지 않은 거래이며, 모든 통계 계산에서 제외됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    /// 내부 거래 ID
    pub id: Uuid,
    /// 거래 소유 사용자
    pub user_id: Uuid,
    /// 거래를 생성한 전략 이름
    pub strategy: String,
    /// 거래 심볼 (예: "BTC/USDT")
    pub symbol: String,
    /// 실현 손익 (미확정이면 None)
    pub profit: Option<Decimal>,
    /// 진입 가격
    pub entry_price: Decimal,
    /// 청산 가격
    pub exit_price: Decimal,
    /// 거래 수량
    pub quantity: Decimal,
    /// 청산 시각 (UTC)
    pub closed_at: DateTime<Utc>,
}

impl ClosedTrade {
    /// 새 청산 거래 기록을 생성합니다.
    ///
    /// 손익은 미확정(`None`) 상태로 시작하며 `with_profit`으로 설정합니다.
    pub fn new(
        user_id: Uuid,
        strategy: impl Into<String>,
        symbol: impl Into<String>,
        entry_price: Decimal,
        exit_price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            strategy: strategy.into(),
            symbol: symbol.into(),
            profit: None,
            entry_price,
            exit_price,
            quantity,
            closed_at: Utc::now(),
        }
    }

    /// 확정 손익을 설정합니다.
    pub fn with_profit(mut self, profit: Decimal) -> Self {
        self.profit = Some(profit);
        self
    }

    /// 청산 시각을 설정합니다.
    pub fn with_closed_at(mut self, closed_at: DateTime<Utc>) -> Self {
        self.closed_at = closed_at;
        self
    }

    /// 이 거래가 수익 거래인지 확인합니다.
    ///
    /// 손익이 확정되지 않았거나 0 이하이면 `false`입니다.
    pub fn is_winner(&self) -> bool {
        matches!(self.profit, Some(p) if p > Decimal::ZERO)
    }

    /// 진입 시점의 명목 가치를 반환합니다 (진입가 × 수량).
    pub fn notional_value(&self) -> Decimal {
        self.entry_price * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_closed_trade_creation() {
        let trade = ClosedTrade::new(
            Uuid::new_v4(),
            "grid_trading",
            "BTC/USDT",
            dec!(50000),
            dec!(52000),
            dec!(0.1),
        )
        .with_profit(dec!(200));

        assert_eq!(trade.profit, Some(dec!(200)));
        assert_eq!(trade.notional_value(), dec!(5000));
        assert!(trade.is_winner());
    }

    #[test]
    fn test_unresolved_trade_is_not_winner() {
        let trade = ClosedTrade::new(
            Uuid::new_v4(),
            "scalping",
            "ETH/USDT",
            dec!(3000),
            dec!(3100),
            dec!(1.0),
        );

        assert_eq!(trade.profit, None);
        assert!(!trade.is_winner());
    }

    #[test]
    fn test_breakeven_trade_is_not_winner() {
        // 손익 0은 수익 거래가 아니다
        let trade = ClosedTrade::new(
            Uuid::new_v4(),
            "scalping",
            "ETH/USDT",
            dec!(3000),
            dec!(3000),
            dec!(1.0),
        )
        .with_profit(Decimal::ZERO);

        assert!(!trade.is_winner());
    }
}
