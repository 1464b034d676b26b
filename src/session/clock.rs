use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::US::Eastern;

/// Source of current time. The session cache checks trading-day validity
/// through this trait exclusively, so day-rollover behavior is testable
/// without waiting for midnight.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The exchange-local calendar date, the unit of session validity.
    fn trading_date(&self) -> NaiveDate {
        self.now().with_timezone(&Eastern).date_naive()
    }
}

/// Wall-clock time, normalized to US/Eastern for trading-date purposes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a fixed instant, advanced explicitly. Used by tests
/// and backtest-style replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
