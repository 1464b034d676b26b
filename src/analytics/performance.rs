use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::journal::ClosedPlanRecord;

/// Profit factor with the no-losses case kept distinguishable from every
/// finite ratio, instead of clamping to some large number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ProfitFactor {
    Ratio(f64),
    NoLosses,
}

impl ProfitFactor {
    pub fn as_f64(&self) -> f64 {
        match self {
            ProfitFactor::Ratio(ratio) => *ratio,
            ProfitFactor::NoLosses => f64::INFINITY,
        }
    }

    pub fn is_no_losses(&self) -> bool {
        matches!(self, ProfitFactor::NoLosses)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupStats {
    pub wins: usize,
    pub losses: usize,
    pub total_pnl: f64,
}

/// Windowed performance summary. All percent fields are pnl-percent based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub profit_factor: ProfitFactor,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub total_pnl_percent: f64,
    /// Share of trades where the trader followed the declared plan.
    pub followed_plan_rate: f64,
    /// Unsorted; presentation ordering is the caller's concern.
    pub setup_breakdown: HashMap<String, SetupStats>,
    pub window_days: i64,
}

impl PerformanceStats {
    fn empty(window_days: i64) -> Self {
        Self {
            total_trades: 0,
            wins: 0,
            losses: 0,
            win_rate: 0.0,
            profit_factor: ProfitFactor::Ratio(0.0),
            avg_win: 0.0,
            avg_loss: 0.0,
            best_trade: 0.0,
            worst_trade: 0.0,
            total_pnl_percent: 0.0,
            followed_plan_rate: 0.0,
            setup_breakdown: HashMap::new(),
            window_days,
        }
    }
}

/// Roll closed-plan records within `[now - window_days, now]` into summary
/// statistics. Pure and read-only.
pub fn summarize(
    records: &[ClosedPlanRecord],
    window_days: i64,
    now: DateTime<Utc>,
) -> PerformanceStats {
    let cutoff = now - Duration::days(window_days);
    let filtered: Vec<&ClosedPlanRecord> = records
        .iter()
        .filter(|r| r.closed_at >= cutoff && r.closed_at <= now)
        .collect();

    if filtered.is_empty() {
        return PerformanceStats::empty(window_days);
    }

    let total = filtered.len();
    let wins: Vec<&&ClosedPlanRecord> = filtered.iter().filter(|r| r.is_win()).collect();
    let losses: Vec<&&ClosedPlanRecord> = filtered.iter().filter(|r| !r.is_win()).collect();
    let sum_wins: f64 = wins.iter().map(|r| r.pnl_percent).sum();
    let sum_losses: f64 = losses.iter().map(|r| r.pnl_percent).sum();

    let profit_factor = if wins.is_empty() {
        ProfitFactor::Ratio(0.0)
    } else if sum_losses.abs() < f64::EPSILON {
        // Breakeven trades count as losses but carry no losing P&L
        ProfitFactor::NoLosses
    } else {
        ProfitFactor::Ratio(round2(sum_wins / sum_losses.abs()))
    };

    let mut setup_breakdown: HashMap<String, SetupStats> = HashMap::new();
    for record in &filtered {
        let stats = setup_breakdown
            .entry(record.setup_type.clone())
            .or_default();
        if record.is_win() {
            stats.wins += 1;
        } else {
            stats.losses += 1;
        }
        stats.total_pnl = round2(stats.total_pnl + record.pnl_percent);
    }

    let followed = filtered.iter().filter(|r| r.followed_plan).count();

    PerformanceStats {
        total_trades: total,
        wins: wins.len(),
        losses: losses.len(),
        win_rate: round1(wins.len() as f64 / total as f64 * 100.0),
        profit_factor,
        avg_win: if wins.is_empty() {
            0.0
        } else {
            round2(sum_wins / wins.len() as f64)
        },
        avg_loss: if losses.is_empty() {
            0.0
        } else {
            round2(sum_losses / losses.len() as f64)
        },
        best_trade: round2(
            filtered
                .iter()
                .map(|r| r.pnl_percent)
                .fold(f64::NEG_INFINITY, f64::max),
        ),
        worst_trade: round2(
            filtered
                .iter()
                .map(|r| r.pnl_percent)
                .fold(f64::INFINITY, f64::min),
        ),
        total_pnl_percent: round2(filtered.iter().map(|r| r.pnl_percent).sum()),
        followed_plan_rate: round1(followed as f64 / total as f64 * 100.0),
        setup_breakdown,
        window_days,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
