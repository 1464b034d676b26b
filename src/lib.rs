pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod scoring;
pub mod session;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
