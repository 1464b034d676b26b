pub mod cache;
pub mod clock;

pub use cache::SessionCache;
pub use clock::{Clock, FixedClock, SystemClock};
