pub mod performance;

pub use performance::{summarize, PerformanceStats, ProfitFactor, SetupStats};
