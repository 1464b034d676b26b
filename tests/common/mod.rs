use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use trade_plan_engine::config::EngineConfig;
use trade_plan_engine::models::session::{CatalystSnapshot, RegimeSnapshot};
use trade_plan_engine::models::{Bias, CatalystRisk, VolatilityTier};
use trade_plan_engine::providers::{CatalystProvider, IndicatorProvider, RegimeProvider};
use trade_plan_engine::scoring::ComponentScores;
use trade_plan_engine::session::FixedClock;

/// A regime provider returning a canned bullish classification.
pub struct MockRegime;

#[async_trait]
impl RegimeProvider for MockRegime {
    async fn fetch_regime(&mut self) -> Result<RegimeSnapshot> {
        Ok(RegimeSnapshot {
            bias: Bias::Bullish,
            volatility_tier: VolatilityTier::Normal,
        })
    }
}

/// A catalyst provider reporting moderate event risk.
pub struct MockCatalysts;

#[async_trait]
impl CatalystProvider for MockCatalysts {
    async fn fetch_catalysts(&mut self) -> Result<CatalystSnapshot> {
        Ok(CatalystSnapshot {
            risk: CatalystRisk::Moderate,
            note: "FOMC minutes Wednesday".to_string(),
        })
    }
}

/// An indicator provider returning fixed component scores for any ticker.
pub struct MockIndicators;

#[async_trait]
impl IndicatorProvider for MockIndicators {
    async fn fetch_component_scores(&mut self, _ticker: &str) -> Result<ComponentScores> {
        Ok(ComponentScores {
            trend: 75.0,
            momentum: 68.0,
            volume: 60.0,
            volatility: 55.0,
            regime: 70.0,
            catalyst: 45.0,
            historical: 50.0,
            personal: 58.0,
        })
    }
}

pub fn test_config() -> EngineConfig {
    EngineConfig {
        entry_fill_tolerance: 0.0,
        state_dir: std::env::temp_dir()
            .join(format!("plan_engine_integ_{}", std::process::id()))
            .to_string_lossy()
            .to_string(),
        log_level: "ERROR".to_string(),
    }
}

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// A clock fixed mid-session: 2024-01-17 10:00 ET.
pub fn midweek_clock() -> FixedClock {
    FixedClock::new(utc("2024-01-17T15:00:00Z"))
}
