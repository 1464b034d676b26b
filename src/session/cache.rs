use chrono::NaiveDate;
use tracing::{debug, info};

use crate::models::session::{CatalystSnapshot, RegimeSnapshot, TradingSession};
use crate::providers::{CatalystProvider, RegimeProvider};
use crate::session::clock::Clock;

/// Holds the single current [`TradingSession`]. A session is valid only for
/// the trading date it was created on; a later date silently evicts it.
#[derive(Debug, Default)]
pub struct SessionCache {
    current: Option<TradingSession>,
    init_count: u32,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh session and replace any cached one. Explicit
    /// re-initialization mid-day is allowed (operator re-runs after a data
    /// correction).
    pub fn initialize(
        &mut self,
        trading_date: NaiveDate,
        regime: RegimeSnapshot,
        catalysts: CatalystSnapshot,
    ) -> &TradingSession {
        self.init_count += 1;
        let session_id = format!("{}-{:02}", trading_date.format("%Y%m%d"), self.init_count);
        info!(
            "session {} initialized: {} bias, {} vol, {} catalyst risk",
            session_id, regime.bias, regime.volatility_tier, catalysts.risk
        );
        self.current.insert(TradingSession {
            session_id,
            trading_date,
            regime,
            catalyst_risk: catalysts.risk,
            catalyst_note: catalysts.note,
        })
    }

    /// Fetch provider inputs and initialize for the clock's current trading
    /// date. A provider failure propagates and nothing is cached.
    pub async fn initialize_from_providers(
        &mut self,
        clock: &dyn Clock,
        regime: &mut dyn RegimeProvider,
        catalysts: &mut dyn CatalystProvider,
    ) -> anyhow::Result<&TradingSession> {
        let regime_snapshot = regime.fetch_regime().await?;
        let catalyst_snapshot = catalysts.fetch_catalysts().await?;
        Ok(self.initialize(clock.trading_date(), regime_snapshot, catalyst_snapshot))
    }

    /// The current session, or `None` if nothing has been initialized for
    /// today's trading date.
    pub fn current(&self, clock: &dyn Clock) -> Option<&TradingSession> {
        let today = clock.trading_date();
        match &self.current {
            Some(session) if session.trading_date == today => Some(session),
            Some(session) => {
                debug!(
                    "cached session {} is stale ({} vs {})",
                    session.session_id, session.trading_date, today
                );
                None
            }
            None => None,
        }
    }
}
