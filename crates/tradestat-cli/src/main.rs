//! 트레이딩 성과 통계 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 최근 30일 사용자 통계
//! tradestat stats -u 7d7f9a2e-1f9b-4a10-9c3e-2f1a58a1b9aa
//!
//! # 최근 7일 전략별 성과
//! tradestat strategy -u 7d7f9a2e-1f9b-4a10-9c3e-2f1a58a1b9aa -d 7
//!
//! # 특정 전략 상세 통계
//! tradestat strategy -u 7d7f9a2e-... -s grid_trading
//!
//! # 일별 손익
//! tradestat daily -u 7d7f9a2e-...
//!
//! # 사용자 설정 조회 및 변경
//! tradestat settings show 7d7f9a2e-...
//! tradestat settings set-mode 7d7f9a2e-... live
//! tradestat settings set-pair 7d7f9a2e-... BTC/USDT --disable
//! ```

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;

use tradestat_core::{init_logging, LogConfig, LogFormat};
use tradestat_data::storage::postgres;

#[derive(Parser)]
#[command(name = "tradestat")]
#[command(about = "트레이딩 성과 통계 CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// 데이터베이스 URL (기본: DATABASE_URL 환경변수)
    #[arg(long)]
    db_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 사용자 성과 통계 조회
    Stats {
        /// 사용자 ID (UUID)
        #[arg(short, long)]
        user: String,

        /// 통계 윈도우 (일, 기본: 설정값)
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// 전략별 성과 조회
    Strategy {
        /// 사용자 ID (UUID)
        #[arg(short, long)]
        user: Option<String>,

        /// 전략 이름 (지정 시 해당 전략 상세 통계)
        #[arg(short, long)]
        strategy: Option<String>,

        /// 통계 윈도우 (일, 기본: 설정값)
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// 일별 손익 조회
    Daily {
        /// 사용자 ID (UUID)
        #[arg(short, long)]
        user: String,

        /// 통계 윈도우 (일, 기본: 설정값)
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// 승률 기준 미달 전략 조회
    Underperforming {
        /// 사용자 ID (UUID)
        #[arg(short, long)]
        user: String,

        /// 통계 윈도우 (일, 기본: 설정값)
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// 청산 거래 수동 기록 (운영 보정/테스트용)
    Record {
        /// 사용자 ID (UUID)
        #[arg(short, long)]
        user: String,

        /// 전략 이름
        #[arg(short, long)]
        strategy: String,

        /// 거래 심볼 (예: BTC/USDT)
        #[arg(long)]
        symbol: String,

        /// 진입 가격
        #[arg(long)]
        entry: rust_decimal::Decimal,

        /// 청산 가격
        #[arg(long)]
        exit: rust_decimal::Decimal,

        /// 거래 수량
        #[arg(long)]
        qty: rust_decimal::Decimal,

        /// 확정 손익 (미지정 시 미확정으로 기록)
        #[arg(long)]
        profit: Option<rust_decimal::Decimal>,
    },

    /// 사용자 트레이딩 설정 관리
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// 데이터베이스 마이그레이션 실행
    Migrate,

    /// 시스템 상태 확인
    Health,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// 설정 조회
    Show {
        /// 사용자 ID (UUID)
        user: String,
    },

    /// 거래 모드 설정 (paper, live)
    SetMode {
        /// 사용자 ID (UUID)
        user: String,
        /// 거래 모드
        mode: String,
    },

    /// 리스크 수준 설정 (low, medium, high)
    SetRisk {
        /// 사용자 ID (UUID)
        user: String,
        /// 리스크 수준
        level: String,
    },

    /// 거래 일시중지
    Pause {
        /// 사용자 ID (UUID)
        user: String,
    },

    /// 거래 재개
    Resume {
        /// 사용자 ID (UUID)
        user: String,
    },

    /// 포지션 한도 설정
    SetLimits {
        /// 사용자 ID (UUID)
        user: String,
        /// 최대 동시 오픈 포지션 수
        #[arg(long)]
        max_positions: Option<i32>,
        /// 포지션당 최대 크기 (포트폴리오 대비 비율, 예: 0.1)
        #[arg(long)]
        max_size: Option<rust_decimal::Decimal>,
    },

    /// 거래쌍 활성화/비활성화
    SetPair {
        /// 사용자 ID (UUID)
        user: String,
        /// 거래 심볼 (예: BTC/USDT)
        symbol: String,
        /// 비활성화로 설정
        #[arg(long)]
        disable: bool,
    },

    /// 전략 활성화/비활성화
    SetStrategy {
        /// 사용자 ID (UUID)
        user: String,
        /// 전략 이름
        strategy: String,
        /// 비활성화로 설정
        #[arg(long)]
        disable: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let app_config = commands::load_config(&cli.config)?;

    let log_format = app_config
        .logging
        .format
        .parse::<LogFormat>()
        .unwrap_or_default();
    init_logging(LogConfig::new(&app_config.logging.level).with_format(log_format))?;

    let db = commands::db_config(cli.db_url.clone(), &app_config)?;
    let statistics = app_config.statistics.clone();

    match cli.command {
        Commands::Stats { user, days } => {
            commands::report::stats(&db, statistics, &user, days).await?;
        }

        Commands::Strategy {
            user,
            strategy,
            days,
        } => {
            commands::report::strategy(&db, statistics, user.as_deref(), strategy.as_deref(), days)
                .await?;
        }

        Commands::Daily { user, days } => {
            commands::report::daily(&db, statistics, &user, days).await?;
        }

        Commands::Underperforming { user, days } => {
            commands::report::underperforming(&db, statistics, &user, days).await?;
        }

        Commands::Record {
            user,
            strategy,
            symbol,
            entry,
            exit,
            qty,
            profit,
        } => {
            commands::record::record(&db, &user, &strategy, &symbol, entry, exit, qty, profit)
                .await?;
        }

        Commands::Settings { action } => match action {
            SettingsAction::Show { user } => {
                commands::settings::show(&db, &user).await?;
            }
            SettingsAction::SetMode { user, mode } => {
                commands::settings::set_mode(&db, &user, &mode).await?;
            }
            SettingsAction::SetRisk { user, level } => {
                commands::settings::set_risk(&db, &user, &level).await?;
            }
            SettingsAction::Pause { user } => {
                commands::settings::set_paused(&db, &user, true).await?;
            }
            SettingsAction::Resume { user } => {
                commands::settings::set_paused(&db, &user, false).await?;
            }
            SettingsAction::SetLimits {
                user,
                max_positions,
                max_size,
            } => {
                commands::settings::set_limits(&db, &user, max_positions, max_size).await?;
            }
            SettingsAction::SetPair {
                user,
                symbol,
                disable,
            } => {
                commands::settings::set_pair(&db, &user, &symbol, !disable).await?;
            }
            SettingsAction::SetStrategy {
                user,
                strategy,
                disable,
            } => {
                commands::settings::set_strategy(&db, &user, &strategy, !disable).await?;
            }
        },

        Commands::Migrate => {
            let pool = postgres::connect(&db).await?;
            postgres::run_migrations(&pool).await?;
            println!("마이그레이션 완료");
        }

        Commands::Health => match postgres::connect(&db).await {
            Ok(pool) => match postgres::health_check(&pool).await {
                Ok(()) => println!("✅ 데이터베이스: 정상"),
                Err(e) => {
                    error!("Health check failed: {}", e);
                    println!("❌ 데이터베이스: 연결 실패");
                    return Err(e.into());
                }
            },
            Err(e) => {
                error!("Database connection failed: {}", e);
                println!("❌ 데이터베이스: 연결 실패");
                return Err(e.into());
            }
        },
    }

    Ok(())
}
