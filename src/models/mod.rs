pub mod direction;
pub mod journal;
pub mod plan;
pub mod session;

pub use direction::*;
pub use journal::ClosedPlanRecord;
pub use plan::{
    Cancellation, Debrief, DeclaredRules, Deviation, EntryFill, EntryZone, ExitRecord, SizePlan,
    StopRule, Target, TradePlan,
};
pub use session::{CatalystSnapshot, RegimeSnapshot, TradingSession};
