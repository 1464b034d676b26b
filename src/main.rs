use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use trade_plan_engine::analytics;
use trade_plan_engine::config::EngineConfig;
use trade_plan_engine::models::session::{CatalystSnapshot, RegimeSnapshot};
use trade_plan_engine::models::{
    Bias, CatalystRisk, DeclaredRules, Direction, EntryZone, ExitType, SizePlan, StopRule, Target,
    VolatilityTier,
};
use trade_plan_engine::providers::{CatalystProvider, RegimeProvider};
use trade_plan_engine::scoring;
use trade_plan_engine::session::{SessionCache, SystemClock};
use trade_plan_engine::trading::PlanBook;

/// Canned providers for the walkthrough; a real host wires these to its
/// market-data and calendar services.
struct StaticRegime;

#[async_trait]
impl RegimeProvider for StaticRegime {
    async fn fetch_regime(&mut self) -> Result<RegimeSnapshot> {
        Ok(RegimeSnapshot {
            bias: Bias::Bullish,
            volatility_tier: VolatilityTier::Normal,
        })
    }
}

struct StaticCatalysts;

#[async_trait]
impl CatalystProvider for StaticCatalysts {
    async fn fetch_catalysts(&mut self) -> Result<CatalystSnapshot> {
        Ok(CatalystSnapshot {
            risk: CatalystRisk::Moderate,
            note: "CPI print Thursday premarket".to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = EngineConfig::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let clock = SystemClock;
    let mut sessions = SessionCache::new();
    let session = sessions
        .initialize_from_providers(&clock, &mut StaticRegime, &mut StaticCatalysts)
        .await?;
    info!(
        "session {} for {}: {}",
        session.session_id, session.trading_date, session.catalyst_note
    );
    let session_id = session.session_id.clone();

    let breakdown = scoring::score(
        scoring::ComponentScores {
            trend: 72.0,
            momentum: 64.0,
            volume: 58.0,
            volatility: 55.0,
            regime: 70.0,
            catalyst: 45.0,
            historical: 50.0,
            personal: 62.0,
        },
        None,
    )?;
    info!(
        "confidence {:.1} ({})",
        scoring::display_composite(breakdown.composite),
        breakdown.rating.label()
    );

    let mut book = PlanBook::new(&cfg);

    let rules = DeclaredRules {
        ticker: "spy".to_string(),
        direction: Direction::Long,
        setup_type: "breakout".to_string(),
        entry_zone: EntryZone {
            low: 100.0,
            high: 102.0,
        },
        stop: StopRule {
            price: 95.0,
            reason: "below support".to_string(),
        },
        targets: vec![
            Target {
                price: 110.0,
                exit_percent: 50.0,
            },
            Target {
                price: 120.0,
                exit_percent: 50.0,
            },
        ],
        risk_reward_ratio: 2.5,
        kill_switch: "close below vwap".to_string(),
        size: SizePlan {
            contracts: 10,
            risk_dollars: 800.0,
        },
    };
    let plan_id = book.create(rules, &session_id)?.plan_id;

    let entry = book.record_entry(plan_id, 103.0, 10, Vec::new())?;
    info!(
        "entry recorded with {} auto deviation(s)",
        entry.auto_deviations.len()
    );

    book.record_exit(plan_id, 110.0, 5, ExitType::Target1, true, Vec::new())?;
    book.record_exit(plan_id, 95.0, 5, ExitType::StoppedOut, false, Vec::new())?;
    let plan = book.get(plan_id)?;
    info!(
        "plan closed as {}: ${:.2} ({:.2}R)",
        plan.status, plan.cumulative_pnl_dollars, plan.realized_r
    );

    let stats = analytics::summarize(&book.closed_records(), 30, Utc::now());
    info!(
        "{} trade(s) in window, win rate {:.1}%",
        stats.total_trades, stats.win_rate
    );

    Ok(())
}
