use anyhow::Result;
use async_trait::async_trait;

use crate::models::session::{CatalystSnapshot, RegimeSnapshot};
use crate::scoring::ComponentScores;

/// Supplies the macro regime classification cached on the trading session.
#[async_trait]
pub trait RegimeProvider: Send + Sync {
    async fn fetch_regime(&mut self) -> Result<RegimeSnapshot>;
}

/// Supplies event-risk context cached on the trading session.
#[async_trait]
pub trait CatalystProvider: Send + Sync {
    async fn fetch_catalysts(&mut self) -> Result<CatalystSnapshot>;
}

/// Supplies per-ticker component scores for confidence scoring. The values
/// are opaque inputs here; indicator math lives with the provider.
#[async_trait]
pub trait IndicatorProvider: Send + Sync {
    async fn fetch_component_scores(&mut self, ticker: &str) -> Result<ComponentScores>;
}
