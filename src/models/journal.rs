use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::plan::TradePlan;
use crate::models::Direction;

/// The unit the performance aggregator consumes: one closed plan (or a
/// manually journaled trade) reduced to its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedPlanRecord {
    pub ticker: String,
    pub direction: Direction,
    pub setup_type: String,
    pub pnl_percent: f64,
    #[serde(default)]
    pub pnl_dollars: Option<f64>,
    pub followed_plan: bool,
    pub closed_at: DateTime<Utc>,
}

impl ClosedPlanRecord {
    /// Win/loss is derived, never stored: breakeven counts as a loss.
    pub fn is_win(&self) -> bool {
        self.pnl_percent > 0.0
    }

    /// Reduce a fully closed plan to a journal record. Open, watching, and
    /// cancelled plans have no outcome and yield `None`.
    pub fn from_plan(plan: &TradePlan) -> Option<Self> {
        if !plan.is_closed() {
            return None;
        }
        let entry = plan.entry.as_ref()?;
        let last_exit = plan.exits.last()?;

        Some(Self {
            ticker: plan.rules.ticker.clone(),
            direction: plan.rules.direction,
            setup_type: plan.rules.setup_type.clone(),
            pnl_percent: plan.cumulative_pnl_percent,
            pnl_dollars: Some(plan.cumulative_pnl_dollars),
            followed_plan: entry.deviation_count == 0
                && plan.exits.iter().all(|e| e.followed_plan),
            closed_at: last_exit.time,
        })
    }
}
