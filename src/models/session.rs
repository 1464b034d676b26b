use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Bias, CatalystRisk, VolatilityTier};

/// Macro regime classification supplied by the regime provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegimeSnapshot {
    pub bias: Bias,
    pub volatility_tier: VolatilityTier,
}

/// Event-risk summary supplied by the catalyst provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalystSnapshot {
    pub risk: CatalystRisk,
    /// Short narrative of the week's scheduled events.
    #[serde(default)]
    pub note: String,
}

/// The once-per-trading-day macro context. Read-only after creation; the
/// trading date is the sole cache-validity key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSession {
    pub session_id: String,
    pub trading_date: NaiveDate,
    pub regime: RegimeSnapshot,
    pub catalyst_risk: CatalystRisk,
    #[serde(default)]
    pub catalyst_note: String,
}
