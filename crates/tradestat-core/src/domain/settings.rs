//! 사용자 트레이딩 설정.
//!
//! 사용자별 운영 설정(거래 모드, 리스크 수준, 일시중지, 포지션 한도)과
//! 거래쌍/전략 활성화 플래그를 정의합니다. 단순 레코드 관리 영역이며
//! 통계 계산에는 관여하지 않습니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 거래 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    /// 모의 거래 (주문 미전송)
    Paper,
    /// 실거래
    Live,
}

impl Default for TradingMode {
    fn default() -> Self {
        Self::Paper
    }
}

impl std::str::FromStr for TradingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paper" => Ok(Self::Paper),
            "live" => Ok(Self::Live),
            _ => Err(format!("Unknown trading mode: {}", s)),
        }
    }
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paper => write!(f, "paper"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// 리스크 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// 보수적
    Low,
    /// 표준
    Medium,
    /// 공격적
    High,
}

impl Default for RiskLevel {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// 사용자별 트레이딩 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTradingSettings {
    /// 사용자 ID
    pub user_id: Uuid,
    /// 거래 모드
    pub trading_mode: TradingMode,
    /// 리스크 수준
    pub risk_level: RiskLevel,
    /// 거래 일시중지 여부
    pub is_paused: bool,
    /// 최대 동시 오픈 포지션 수
    pub max_open_positions: i32,
    /// 포지션당 최대 크기 (포트폴리오 대비 비율, 0.1 = 10%)
    pub max_position_size: Decimal,
    /// 마지막 수정 시각
    pub updated_at: DateTime<Utc>,
}

impl UserTradingSettings {
    /// 기본 설정을 생성합니다.
    ///
    /// 저장된 설정이 없는 사용자에게 적용되는 값입니다.
    pub fn default_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            trading_mode: TradingMode::default(),
            risk_level: RiskLevel::default(),
            is_paused: false,
            max_open_positions: 5,
            max_position_size: dec!(0.1),
            updated_at: Utc::now(),
        }
    }
}

/// 사용자별 거래쌍 활성화 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSetting {
    /// 거래 심볼 (예: "BTC/USDT")
    pub symbol: String,
    /// 활성화 여부
    pub enabled: bool,
}

/// 사용자별 전략 활성화 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySetting {
    /// 전략 이름
    pub strategy: String,
    /// 활성화 여부
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trading_mode_from_str() {
        assert_eq!("paper".parse::<TradingMode>().unwrap(), TradingMode::Paper);
        assert_eq!("LIVE".parse::<TradingMode>().unwrap(), TradingMode::Live);
        assert!("margin".parse::<TradingMode>().is_err());
    }

    #[test]
    fn test_risk_level_from_str() {
        assert_eq!("low".parse::<RiskLevel>().unwrap(), RiskLevel::Low);
        assert_eq!("Medium".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!("extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_default_settings() {
        let user_id = Uuid::new_v4();
        let settings = UserTradingSettings::default_for(user_id);

        assert_eq!(settings.user_id, user_id);
        assert_eq!(settings.trading_mode, TradingMode::Paper);
        assert_eq!(settings.risk_level, RiskLevel::Medium);
        assert!(!settings.is_paused);
        // 포지션 크기 기본값은 포트폴리오의 10%
        assert_eq!(settings.max_position_size, dec!(0.1));
    }

    #[test]
    fn test_mode_display_round_trip() {
        let mode: TradingMode = TradingMode::Live.to_string().parse().unwrap();
        assert_eq!(mode, TradingMode::Live);

        let level: RiskLevel = RiskLevel::High.to_string().parse().unwrap();
        assert_eq!(level, RiskLevel::High);
    }
}
