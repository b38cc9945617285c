//! 거래 기록 저장소 추상화.
//!
//! 통계 서비스가 청산 거래를 조회하기 위한 추상화 계층을 제공합니다.
//! 실제 구현은 tradestat-data 크레이트의 Postgres repository입니다.

use crate::domain::ClosedTrade;
use crate::error::StatsResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 청산 거래 저장소.
///
/// # 구현 계약
///
/// - 반환 목록은 `closed_at` 오름차순으로 정렬되어야 합니다.
///   누적 손익 기반 낙폭 계산이 이 순서를 전제로 합니다.
/// - 조회 실패는 반드시 `Err`로 반환해야 합니다. 저장소 오류를
///   빈 목록으로 바꾸면 "알 수 없음"이 "거래 없음"으로 둔갑하여
///   통계가 오염됩니다.
/// - 기간 경계는 양끝 포함(`start <= closed_at <= end`)입니다.
#[async_trait]
pub trait TradeRecordStore: Send + Sync {
    /// 사용자의 청산 거래를 기간으로 조회합니다.
    async fn closed_trades(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatsResult<Vec<ClosedTrade>>;

    /// 사용자/전략 필터를 선택적으로 적용하여 청산 거래를 조회합니다.
    ///
    /// `user_id`가 `None`이면 전체 사용자, `strategy`가 `None`이면
    /// 전체 전략이 대상입니다.
    async fn closed_trades_filtered(
        &self,
        user_id: Option<Uuid>,
        strategy: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatsResult<Vec<ClosedTrade>>;
}
