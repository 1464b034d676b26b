use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::journal::ClosedPlanRecord;
use crate::models::plan::{
    Cancellation, Debrief, DeclaredRules, Deviation, EntryFill, ExitRecord, TradePlan,
};
use crate::models::{ExitType, PlanStatus};

/// Owns every tracked plan and is its sole mutator. Callers serialize
/// mutating operations per plan id; the book itself performs no locking.
///
/// Rejections never mutate: every operation validates fully before touching
/// the plan.
pub struct PlanBook {
    plans: HashMap<u64, TradePlan>,
    plan_counter: u64,
    entry_tolerance: f64,
    plans_file: String,
    /// When set, used instead of Utc::now() for timestamps (tests, replays)
    pub sim_time: Option<DateTime<Utc>>,
}

impl PlanBook {
    pub fn new(cfg: &EngineConfig) -> Self {
        let mut book = Self {
            plans: HashMap::new(),
            plan_counter: 0,
            entry_tolerance: cfg.entry_fill_tolerance,
            plans_file: cfg.plans_file(),
            sim_time: None,
        };
        book.load_state();
        book
    }

    /// A book without snapshot persistence or prior state.
    pub fn new_fresh(cfg: &EngineConfig) -> Self {
        Self {
            plans: HashMap::new(),
            plan_counter: 0,
            entry_tolerance: cfg.entry_fill_tolerance,
            plans_file: String::new(),
            sim_time: None,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.sim_time.unwrap_or_else(Utc::now)
    }

    /// Create a plan in `watching` from its declared rules.
    pub fn create(&mut self, rules: DeclaredRules, session_id: &str) -> EngineResult<&TradePlan> {
        validate_rules(&rules)?;

        self.plan_counter += 1;
        let plan_id = self.plan_counter;

        let mut rules = rules;
        rules.ticker = rules.ticker.trim().to_uppercase();

        let plan = TradePlan {
            plan_id,
            session_id: session_id.to_string(),
            created_at: self.now(),
            rules,
            status: PlanStatus::Watching,
            entry: None,
            exits: Vec::new(),
            remaining_contracts: 0,
            cumulative_pnl_dollars: 0.0,
            cumulative_pnl_percent: 0.0,
            realized_r: 0.0,
            cancellation: None,
            debrief: None,
        };
        info!(
            "plan {} created: {} {} ({})",
            plan_id, plan.rules.ticker, plan.rules.direction, plan.rules.setup_type
        );
        self.plans.insert(plan_id, plan);
        self.save_state();

        self.plans
            .get(&plan_id)
            .ok_or_else(|| EngineError::NotFound(format!("plan {plan_id}")))
    }

    /// Record the entry fill. Auto-detects deviations against the declared
    /// rules; self-reported deviations are stored verbatim alongside, never
    /// merged or deduplicated.
    pub fn record_entry(
        &mut self,
        plan_id: u64,
        fill_price: f64,
        contracts: u32,
        self_reported_deviations: Vec<String>,
    ) -> EngineResult<&EntryFill> {
        if contracts == 0 {
            return Err(EngineError::InvalidInput(
                "entry contracts must be positive".to_string(),
            ));
        }
        if fill_price <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "entry fill price must be positive, got {fill_price}"
            )));
        }

        let now = self.now();
        let tolerance = self.entry_tolerance;
        let plan = self
            .plans
            .get_mut(&plan_id)
            .ok_or_else(|| EngineError::NotFound(format!("plan {plan_id}")))?;
        if !plan.status.may_become(PlanStatus::Entered) {
            return Err(EngineError::InvalidTransition {
                from: plan.status,
                action: "enter",
            });
        }

        let mut auto_deviations = Vec::new();
        let zone = plan.rules.entry_zone;
        if fill_price > zone.high + tolerance {
            auto_deviations.push(Deviation {
                code: "fill_above_zone".to_string(),
                detail: format!(
                    "fill {:.2} above zone high {:.2} by {:.2}",
                    fill_price,
                    zone.high,
                    fill_price - zone.high
                ),
            });
        } else if fill_price < zone.low - tolerance {
            auto_deviations.push(Deviation {
                code: "fill_below_zone".to_string(),
                detail: format!(
                    "fill {:.2} below zone low {:.2} by {:.2}",
                    fill_price,
                    zone.low,
                    zone.low - fill_price
                ),
            });
        }
        if plan.rules.size.contracts > 0 && contracts > plan.rules.size.contracts {
            auto_deviations.push(Deviation {
                code: "oversized".to_string(),
                detail: format!(
                    "{} contracts filled vs {} planned",
                    contracts, plan.rules.size.contracts
                ),
            });
        }

        let deviation_count = auto_deviations.len() + self_reported_deviations.len();
        plan.entry = Some(EntryFill {
            fill_price,
            contracts,
            time: now,
            auto_deviations,
            self_reported_deviations,
            deviation_count,
        });
        plan.remaining_contracts = contracts;
        plan.status = PlanStatus::Entered;
        info!(
            "plan {} entered: {} x{} @ {} ({} deviations)",
            plan_id, plan.rules.ticker, contracts, fill_price, deviation_count
        );

        self.save_state();
        self.plans
            .get(&plan_id)
            .and_then(|p| p.entry.as_ref())
            .ok_or_else(|| EngineError::NotFound(format!("plan {plan_id}")))
    }

    /// Record a partial or full exit. Cumulative figures are recomputed by
    /// folding over the full exit log so they stay replayable. When the last
    /// contract exits, the final exit's type decides the terminal status:
    /// stop-triggered closes as `stopped_out`, anything else as `exited`.
    pub fn record_exit(
        &mut self,
        plan_id: u64,
        price: f64,
        contracts: u32,
        exit_type: ExitType,
        followed_plan: bool,
        deviations: Vec<String>,
    ) -> EngineResult<&ExitRecord> {
        if contracts == 0 {
            return Err(EngineError::InvalidInput(
                "exit contracts must be positive".to_string(),
            ));
        }

        let now = self.now();
        let plan = self
            .plans
            .get_mut(&plan_id)
            .ok_or_else(|| EngineError::NotFound(format!("plan {plan_id}")))?;
        if plan.status != PlanStatus::Entered {
            return Err(EngineError::InvalidTransition {
                from: plan.status,
                action: "exit",
            });
        }
        let entry = plan.entry.clone().ok_or(EngineError::InvalidTransition {
            from: plan.status,
            action: "exit",
        })?;
        if contracts > plan.remaining_contracts {
            return Err(EngineError::InvalidInput(format!(
                "cannot exit {} contracts, only {} remaining",
                contracts, plan.remaining_contracts
            )));
        }

        let sign = plan.rules.direction.sign();
        let pnl_dollars = round2((price - entry.fill_price) * contracts as f64 * sign);
        // Percent P&L always uses the entry fill price as denominator, even
        // for partial exits.
        let pnl_percent = round2((price - entry.fill_price) / entry.fill_price * 100.0 * sign);
        let remaining_after = plan.remaining_contracts - contracts;

        plan.exits.push(ExitRecord {
            price,
            contracts,
            time: now,
            exit_type,
            followed_plan,
            deviations,
            pnl_dollars,
            pnl_percent,
            remaining_after,
        });
        plan.remaining_contracts = remaining_after;

        plan.cumulative_pnl_dollars = round2(plan.exits.iter().map(|e| e.pnl_dollars).sum());
        let contracts_exited: f64 = plan.exits.iter().map(|e| e.contracts as f64).sum();
        plan.cumulative_pnl_percent = round2(
            plan.exits
                .iter()
                .map(|e| e.pnl_percent * e.contracts as f64)
                .sum::<f64>()
                / contracts_exited,
        );
        let initial_risk_dollars =
            (entry.fill_price - plan.rules.stop.price).abs() * entry.contracts as f64;
        plan.realized_r = if initial_risk_dollars > 0.0 {
            plan.cumulative_pnl_dollars / initial_risk_dollars
        } else {
            0.0
        };

        if plan.remaining_contracts == 0 {
            plan.status = if exit_type.is_stop_triggered() {
                PlanStatus::StoppedOut
            } else {
                PlanStatus::Exited
            };
            info!(
                "plan {} closed as {}: cumulative P&L ${:.2} ({:.2}R)",
                plan_id, plan.status, plan.cumulative_pnl_dollars, plan.realized_r
            );
        } else {
            debug!(
                "plan {} partial exit: {} x{} @ {}, {} remaining",
                plan_id, exit_type, contracts, price, plan.remaining_contracts
            );
        }

        self.save_state();
        self.plans
            .get(&plan_id)
            .and_then(|p| p.exits.last())
            .ok_or_else(|| EngineError::NotFound(format!("plan {plan_id}")))
    }

    /// Cancel a plan that was never entered. A filled plan cannot be
    /// cancelled, only closed via exits.
    pub fn cancel(&mut self, plan_id: u64, reason: &str) -> EngineResult<()> {
        let now = self.now();
        let plan = self
            .plans
            .get_mut(&plan_id)
            .ok_or_else(|| EngineError::NotFound(format!("plan {plan_id}")))?;
        if !plan.status.may_become(PlanStatus::Cancelled) {
            return Err(EngineError::InvalidTransition {
                from: plan.status,
                action: "cancel",
            });
        }

        plan.status = PlanStatus::Cancelled;
        plan.cancellation = Some(Cancellation {
            reason: reason.to_string(),
            time: now,
        });
        info!("plan {} cancelled: {}", plan_id, reason);

        self.save_state();
        Ok(())
    }

    /// Attach the debrief and mark the plan reviewed. Idempotent: reviewing
    /// an already-reviewed plan returns the existing debrief unchanged.
    pub fn review(&mut self, plan_id: u64, debrief: Debrief) -> EngineResult<&Debrief> {
        let mut changed = false;
        {
            let plan = self
                .plans
                .get_mut(&plan_id)
                .ok_or_else(|| EngineError::NotFound(format!("plan {plan_id}")))?;
            if plan.status == PlanStatus::Reviewed {
                debug!("plan {} already reviewed, keeping original debrief", plan_id);
            } else {
                if !plan.status.may_become(PlanStatus::Reviewed) {
                    return Err(EngineError::InvalidTransition {
                        from: plan.status,
                        action: "review",
                    });
                }
                plan.status = PlanStatus::Reviewed;
                plan.debrief = Some(debrief);
                info!("plan {} reviewed", plan_id);
                changed = true;
            }
        }

        if changed {
            self.save_state();
        }
        self.plans
            .get(&plan_id)
            .and_then(|p| p.debrief.as_ref())
            .ok_or_else(|| EngineError::NotFound(format!("plan {plan_id}")))
    }

    pub fn get(&self, plan_id: u64) -> EngineResult<&TradePlan> {
        self.plans
            .get(&plan_id)
            .ok_or_else(|| EngineError::NotFound(format!("plan {plan_id}")))
    }

    pub fn plans_for_session(&self, session_id: &str) -> Vec<&TradePlan> {
        let mut plans: Vec<&TradePlan> = self
            .plans
            .values()
            .filter(|p| p.session_id == session_id)
            .collect();
        plans.sort_by_key(|p| p.plan_id);
        plans
    }

    /// Journal records for every fully closed plan, in creation order.
    pub fn closed_records(&self) -> Vec<ClosedPlanRecord> {
        let mut plans: Vec<&TradePlan> = self.plans.values().collect();
        plans.sort_by_key(|p| p.plan_id);
        plans
            .into_iter()
            .filter_map(ClosedPlanRecord::from_plan)
            .collect()
    }

    fn save_state(&self) {
        if self.plans_file.is_empty() {
            return;
        }
        let _ = fs::create_dir_all(
            Path::new(&self.plans_file)
                .parent()
                .unwrap_or(Path::new("state")),
        );

        let state = serde_json::json!({
            "plan_counter": self.plan_counter,
            "plans": self.plans,
        });

        if let Ok(json) = serde_json::to_string_pretty(&state) {
            let _ = fs::write(&self.plans_file, json);
        }
    }

    fn load_state(&mut self) {
        if self.plans_file.is_empty() {
            return;
        }
        if let Ok(content) = fs::read_to_string(&self.plans_file) {
            if let Ok(state) = serde_json::from_str::<serde_json::Value>(&content) {
                self.plan_counter = state["plan_counter"].as_u64().unwrap_or(0);
                if let Ok(plans) =
                    serde_json::from_value::<HashMap<u64, TradePlan>>(state["plans"].clone())
                {
                    self.plans = plans;
                }
            }
        }
    }
}

fn validate_rules(rules: &DeclaredRules) -> EngineResult<()> {
    if rules.ticker.trim().is_empty() {
        return Err(EngineError::InvalidInput("ticker is required".to_string()));
    }
    if rules.entry_zone.low > rules.entry_zone.high {
        return Err(EngineError::InvalidInput(format!(
            "entry zone low {} exceeds high {}",
            rules.entry_zone.low, rules.entry_zone.high
        )));
    }
    let mut exit_percent_total = 0.0;
    for target in &rules.targets {
        if target.exit_percent <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "target exit percent must be positive, got {}",
                target.exit_percent
            )));
        }
        exit_percent_total += target.exit_percent;
    }
    if exit_percent_total > 100.0 + 1e-9 {
        return Err(EngineError::InvalidInput(format!(
            "target exit percents sum to {exit_percent_total}, max 100"
        )));
    }
    Ok(())
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
