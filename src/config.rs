use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Absolute price tolerance around the entry zone before a fill is
    /// flagged as a deviation. Default 0: any miss is flagged.
    pub entry_fill_tolerance: f64,

    // Local snapshot persistence
    pub state_dir: String,

    // Logging
    pub log_level: String,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        EngineConfig {
            entry_fill_tolerance: env("ENTRY_FILL_TOLERANCE", "0").parse().unwrap_or(0.0),
            state_dir: env("STATE_DIR", "state"),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    pub fn plans_file(&self) -> String {
        format!("{}/plans.json", self.state_dir)
    }
}
