use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }

    /// Multiplier applied to price moves when computing P&L.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    /// Instrument-facing label for options-style plans.
    pub fn option_label(&self) -> &'static str {
        match self {
            Direction::Long => "call",
            Direction::Short => "put",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bias::Bullish => write!(f, "bullish"),
            Bias::Bearish => write!(f, "bearish"),
            Bias::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityTier {
    Low,
    Normal,
    Elevated,
    Extreme,
}

impl fmt::Display for VolatilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityTier::Low => write!(f, "low"),
            VolatilityTier::Normal => write!(f, "normal"),
            VolatilityTier::Elevated => write!(f, "elevated"),
            VolatilityTier::Extreme => write!(f, "extreme"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalystRisk {
    Low,
    Moderate,
    High,
    Extreme,
}

impl fmt::Display for CatalystRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalystRisk::Low => write!(f, "low"),
            CatalystRisk::Moderate => write!(f, "moderate"),
            CatalystRisk::High => write!(f, "high"),
            CatalystRisk::Extreme => write!(f, "extreme"),
        }
    }
}

/// Plan lifecycle status. Transitions are monotonic and encoded in
/// [`PlanStatus::may_become`]; no operation moves a plan backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Watching,
    Entered,
    Exited,
    StoppedOut,
    Cancelled,
    Reviewed,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Watching => write!(f, "watching"),
            PlanStatus::Entered => write!(f, "entered"),
            PlanStatus::Exited => write!(f, "exited"),
            PlanStatus::StoppedOut => write!(f, "stopped_out"),
            PlanStatus::Cancelled => write!(f, "cancelled"),
            PlanStatus::Reviewed => write!(f, "reviewed"),
        }
    }
}

impl PlanStatus {
    /// The transition table. `watching -> entered | cancelled`;
    /// `entered -> exited | stopped_out`; every entered, closed, or
    /// cancelled state may become `reviewed`; `reviewed` is final.
    pub fn may_become(self, next: PlanStatus) -> bool {
        use PlanStatus::*;
        matches!(
            (self, next),
            (Watching, Entered)
                | (Watching, Cancelled)
                | (Entered, Exited)
                | (Entered, StoppedOut)
                | (Entered, Reviewed)
                | (Exited, Reviewed)
                | (StoppedOut, Reviewed)
                | (Cancelled, Reviewed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PlanStatus::Cancelled | PlanStatus::Reviewed)
    }
}

/// How an exit was classified by the caller. The state machine trusts this
/// classification and never infers it from price; the raw fill price is
/// recorded so audits can flag mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitType {
    #[serde(rename = "target_1")]
    Target1,
    #[serde(rename = "target_2")]
    Target2,
    #[serde(rename = "stopped_out")]
    StoppedOut,
    #[serde(rename = "manual")]
    Manual,
    #[serde(rename = "time_stop")]
    TimeStop,
}

impl fmt::Display for ExitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitType::Target1 => write!(f, "target_1"),
            ExitType::Target2 => write!(f, "target_2"),
            ExitType::StoppedOut => write!(f, "stopped_out"),
            ExitType::Manual => write!(f, "manual"),
            ExitType::TimeStop => write!(f, "time_stop"),
        }
    }
}

impl ExitType {
    pub fn is_stop_triggered(&self) -> bool {
        matches!(self, ExitType::StoppedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_forward_only() {
        use PlanStatus::*;
        assert!(Watching.may_become(Entered));
        assert!(Watching.may_become(Cancelled));
        assert!(Entered.may_become(Exited));
        assert!(Entered.may_become(StoppedOut));
        assert!(Entered.may_become(Reviewed));
        assert!(Exited.may_become(Reviewed));
        assert!(StoppedOut.may_become(Reviewed));
        assert!(Cancelled.may_become(Reviewed));

        // No backward or skipping moves
        assert!(!Watching.may_become(Exited));
        assert!(!Watching.may_become(StoppedOut));
        assert!(!Watching.may_become(Reviewed));
        assert!(!Entered.may_become(Watching));
        assert!(!Entered.may_become(Cancelled));
        assert!(!Exited.may_become(Entered));
        assert!(!Cancelled.may_become(Entered));
        for next in [Watching, Entered, Exited, StoppedOut, Cancelled, Reviewed] {
            assert!(!Reviewed.may_become(next));
        }
    }

    #[test]
    fn exit_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&ExitType::Target1).unwrap(),
            "\"target_1\""
        );
        assert_eq!(
            serde_json::to_string(&ExitType::TimeStop).unwrap(),
            "\"time_stop\""
        );
        let parsed: ExitType = serde_json::from_str("\"stopped_out\"").unwrap();
        assert_eq!(parsed, ExitType::StoppedOut);
    }

    #[test]
    fn only_stop_exit_is_stop_triggered() {
        assert!(ExitType::StoppedOut.is_stop_triggered());
        assert!(!ExitType::Target1.is_stop_triggered());
        assert!(!ExitType::Target2.is_stop_triggered());
        assert!(!ExitType::Manual.is_stop_triggered());
        assert!(!ExitType::TimeStop.is_stop_triggered());
    }

    #[test]
    fn direction_sign_and_labels() {
        assert_eq!(Direction::Long.sign(), 1.0);
        assert_eq!(Direction::Short.sign(), -1.0);
        assert_eq!(Direction::Long.option_label(), "call");
        assert_eq!(Direction::Short.option_label(), "put");
    }
}
