use serde::{Deserialize, Serialize};

use crate::work_history::DEFAULT_STREAK_SCAN_LIMIT;

/// Environment variable that overrides `manager_email`.
pub const MANAGER_EMAIL_ENV: &str = "BURNOUT_MANAGER_EMAIL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SQLite file path, or ":memory:".
    pub database_path: String,
    /// Recipient of high-risk notices.
    pub manager_email: String,
    /// Recent worked entries scanned when counting a streak.
    pub streak_scan_limit: usize,
    /// Look-back for the "alerts this week" statistic.
    pub alert_window_days: i64,
    /// Default look-back for a staff member's score history.
    pub history_days: i64,
    /// Default size of the top-risk list.
    pub top_risk_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: "burnout.db".into(),
            manager_email: "manager@hospital.com".into(),
            streak_scan_limit: DEFAULT_STREAK_SCAN_LIMIT,
            alert_window_days: 7,
            history_days: 30,
            top_risk_limit: 5,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading engine config {path}"))?;
        let mut config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing engine config {path}"))?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(email) = std::env::var(MANAGER_EMAIL_ENV) {
            if !email.trim().is_empty() {
                self.manager_email = email;
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.streak_scan_limit > 0, "streak_scan_limit must be positive");
        anyhow::ensure!(self.alert_window_days >= 0, "alert_window_days must not be negative");
        anyhow::ensure!(self.history_days >= 0, "history_days must not be negative");
        Ok(())
    }

    /// Config with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        Self {
            database_path: ":memory:".into(),
            manager_email: "test-manager@hospital.test".into(),
            ..Self::default()
        }
    }
}
