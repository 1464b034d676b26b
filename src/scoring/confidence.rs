use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// The fixed set of scoreable components. Map-based inputs are rejected if
/// they name anything else.
pub const COMPONENT_NAMES: [&str; 8] = [
    "trend",
    "momentum",
    "volume",
    "volatility",
    "regime",
    "catalyst",
    "historical",
    "personal",
];

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Eight named component scores, each expected in [0,100]. Out-of-range
/// values are clamped before weighting so one bad input cannot skew the
/// composite disproportionately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub trend: f64,
    pub momentum: f64,
    pub volume: f64,
    pub volatility: f64,
    pub regime: f64,
    pub catalyst: f64,
    pub historical: f64,
    pub personal: f64,
}

impl ComponentScores {
    pub fn uniform(value: f64) -> Self {
        Self {
            trend: value,
            momentum: value,
            volume: value,
            volatility: value,
            regime: value,
            catalyst: value,
            historical: value,
            personal: value,
        }
    }

    /// Build from a name->score map. Every component must be present;
    /// unknown names are rejected.
    pub fn from_map(map: &HashMap<String, f64>) -> EngineResult<Self> {
        for key in map.keys() {
            if !COMPONENT_NAMES.contains(&key.as_str()) {
                return Err(EngineError::InvalidInput(format!(
                    "unknown confidence component '{key}'"
                )));
            }
        }
        let get = |name: &str| -> EngineResult<f64> {
            map.get(name).copied().ok_or_else(|| {
                EngineError::InvalidInput(format!("missing confidence component '{name}'"))
            })
        };
        Ok(Self {
            trend: get("trend")?,
            momentum: get("momentum")?,
            volume: get("volume")?,
            volatility: get("volatility")?,
            regime: get("regime")?,
            catalyst: get("catalyst")?,
            historical: get("historical")?,
            personal: get("personal")?,
        })
    }

    fn clamped(self) -> Self {
        Self {
            trend: self.trend.clamp(0.0, 100.0),
            momentum: self.momentum.clamp(0.0, 100.0),
            volume: self.volume.clamp(0.0, 100.0),
            volatility: self.volatility.clamp(0.0, 100.0),
            regime: self.regime.clamp(0.0, 100.0),
            catalyst: self.catalyst.clamp(0.0, 100.0),
            historical: self.historical.clamp(0.0, 100.0),
            personal: self.personal.clamp(0.0, 100.0),
        }
    }

    fn as_array(&self) -> [f64; 8] {
        [
            self.trend,
            self.momentum,
            self.volume,
            self.volatility,
            self.regime,
            self.catalyst,
            self.historical,
            self.personal,
        ]
    }
}

/// Component weights. Must sum to 1.0 within 1e-6.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub trend: f64,
    pub momentum: f64,
    pub volume: f64,
    pub volatility: f64,
    pub regime: f64,
    pub catalyst: f64,
    pub historical: f64,
    pub personal: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            trend: 0.20,
            momentum: 0.15,
            volume: 0.10,
            volatility: 0.10,
            regime: 0.15,
            catalyst: 0.15,
            historical: 0.10,
            personal: 0.05,
        }
    }
}

impl Weights {
    pub fn from_map(map: &HashMap<String, f64>) -> EngineResult<Self> {
        for key in map.keys() {
            if !COMPONENT_NAMES.contains(&key.as_str()) {
                return Err(EngineError::InvalidInput(format!(
                    "unknown confidence component '{key}'"
                )));
            }
        }
        let get = |name: &str| -> EngineResult<f64> {
            map.get(name).copied().ok_or_else(|| {
                EngineError::InvalidInput(format!("missing weight for component '{name}'"))
            })
        };
        Ok(Self {
            trend: get("trend")?,
            momentum: get("momentum")?,
            volume: get("volume")?,
            volatility: get("volatility")?,
            regime: get("regime")?,
            catalyst: get("catalyst")?,
            historical: get("historical")?,
            personal: get("personal")?,
        })
    }

    fn as_array(&self) -> [f64; 8] {
        [
            self.trend,
            self.momentum,
            self.volume,
            self.volatility,
            self.regime,
            self.catalyst,
            self.historical,
            self.personal,
        ]
    }

    fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    pub fn validate(&self) -> EngineResult<()> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::InvalidInput(format!(
                "confidence weights sum to {sum}, expected 1.0"
            )));
        }
        Ok(())
    }
}

/// Letter tier derived from the composite via fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    A,
    B,
    C,
    D,
    F,
}

impl Rating {
    /// Thresholds evaluated top-down: 80 / 65 / 50 / 35.
    pub fn from_composite(composite: f64) -> Self {
        if composite >= 80.0 {
            Rating::A
        } else if composite >= 65.0 {
            Rating::B
        } else if composite >= 50.0 {
            Rating::C
        } else if composite >= 35.0 {
            Rating::D
        } else {
            Rating::F
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::A => "A — High Conviction",
            Rating::B => "B — Favorable Setup",
            Rating::C => "C — Mixed Signals",
            Rating::D => "D — Proceed With Caution",
            Rating::F => "F — Avoid",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::A => write!(f, "A"),
            Rating::B => write!(f, "B"),
            Rating::C => write!(f, "C"),
            Rating::D => write!(f, "D"),
            Rating::F => write!(f, "F"),
        }
    }
}

/// The scored breakdown: clamped components, the weights actually applied,
/// the full-precision composite, and the derived tier. Every score is
/// explainable from its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub components: ComponentScores,
    pub weights: Weights,
    pub composite: f64,
    pub rating: Rating,
}

/// Pure scoring function: no I/O, no hidden state, identical inputs always
/// produce identical output.
pub fn score(
    components: ComponentScores,
    weights: Option<&Weights>,
) -> EngineResult<ConfidenceBreakdown> {
    let weights = weights.copied().unwrap_or_default();
    weights.validate()?;

    let clamped = components.clamped();
    let composite = clamped
        .as_array()
        .iter()
        .zip(weights.as_array())
        .map(|(component, weight)| component * weight)
        .sum::<f64>()
        .clamp(0.0, 100.0);

    Ok(ConfidenceBreakdown {
        components: clamped,
        weights,
        composite,
        rating: Rating::from_composite(composite),
    })
}

/// Composite is stored at full precision; round only for display.
pub fn display_composite(composite: f64) -> f64 {
    (composite * 10.0).round() / 10.0
}
