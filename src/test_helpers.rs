use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::models::journal::ClosedPlanRecord;
use crate::models::plan::{DeclaredRules, EntryZone, SizePlan, StopRule, Target};
use crate::models::Direction;

/// A fixed mid-session instant: 2024-01-16 10:30 ET.
pub fn test_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-16T15:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// A config suitable for testing: zero tolerance, no env lookups.
pub fn default_test_config() -> EngineConfig {
    EngineConfig {
        entry_fill_tolerance: 0.0,
        state_dir: std::env::temp_dir()
            .join("plan_engine_test")
            .to_string_lossy()
            .to_string(),
        log_level: "ERROR".to_string(),
    }
}

/// Declared rules with entry zone 100-102, stop 95, two 50% targets,
/// 10 planned contracts.
pub fn sample_rules(ticker: &str, direction: Direction) -> DeclaredRules {
    DeclaredRules {
        ticker: ticker.to_string(),
        direction,
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
    }
}

/// A journal record that followed its plan, closed at the given time.
pub fn closed_record(
    setup_type: &str,
    pnl_percent: f64,
    closed_at: DateTime<Utc>,
) -> ClosedPlanRecord {
    ClosedPlanRecord {
        ticker: "SPY".to_string(),
        direction: Direction::Long,
        setup_type: setup_type.to_string(),
        pnl_percent,
        pnl_dollars: None,
        followed_plan: true,
        closed_at,
    }
}
