use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Direction, ExitType, PlanStatus};

/// The declared price range within which an entry fill is "on plan".
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntryZone {
    pub low: f64,
    pub high: f64,
}

impl EntryZone {
    pub fn contains(&self, price: f64, tolerance: f64) -> bool {
        price >= self.low - tolerance && price <= self.high + tolerance
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRule {
    pub price: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target {
    pub price: f64,
    pub exit_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizePlan {
    pub contracts: u32,
    pub risk_dollars: f64,
}

/// The rules a plan declares at creation. Immutable once the plan leaves
/// `watching`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredRules {
    pub ticker: String,
    pub direction: Direction,
    pub setup_type: String,
    pub entry_zone: EntryZone,
    pub stop: StopRule,
    pub targets: Vec<Target>,
    pub risk_reward_ratio: f64,
    pub kill_switch: String,
    pub size: SizePlan,
}

/// An auto-detected departure from the plan's declared rules.
/// Self-reported deviations are stored as raw strings alongside, never
/// merged with these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub code: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryFill {
    pub fill_price: f64,
    pub contracts: u32,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub auto_deviations: Vec<Deviation>,
    #[serde(default)]
    pub self_reported_deviations: Vec<String>,
    #[serde(default)]
    pub deviation_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitRecord {
    pub price: f64,
    pub contracts: u32,
    pub time: DateTime<Utc>,
    pub exit_type: ExitType,
    pub followed_plan: bool,
    #[serde(default)]
    pub deviations: Vec<String>,
    pub pnl_dollars: f64,
    pub pnl_percent: f64,
    pub remaining_after: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cancellation {
    pub reason: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debrief {
    pub summary: String,
    #[serde(default)]
    pub lessons: Vec<String>,
}

/// A tracked trade plan. Mutated only through the
/// [`PlanBook`](crate::trading::PlanBook); everything else treats it as a
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePlan {
    pub plan_id: u64,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub rules: DeclaredRules,
    pub status: PlanStatus,
    #[serde(default)]
    pub entry: Option<EntryFill>,
    /// Append-only exit log; corrections are compensating exits, not edits.
    #[serde(default)]
    pub exits: Vec<ExitRecord>,
    #[serde(default)]
    pub remaining_contracts: u32,
    #[serde(default)]
    pub cumulative_pnl_dollars: f64,
    #[serde(default)]
    pub cumulative_pnl_percent: f64,
    /// Cumulative dollar P&L as a multiple of the initial entry-to-stop risk.
    #[serde(default)]
    pub realized_r: f64,
    #[serde(default)]
    pub cancellation: Option<Cancellation>,
    #[serde(default)]
    pub debrief: Option<Debrief>,
}

impl TradePlan {
    pub fn ticker(&self) -> &str {
        &self.rules.ticker
    }

    pub fn direction(&self) -> Direction {
        self.rules.direction
    }

    /// Fully closed: an entry exists and every contract has been exited.
    pub fn is_closed(&self) -> bool {
        self.entry.is_some() && !self.exits.is_empty() && self.remaining_contracts == 0
    }
}
