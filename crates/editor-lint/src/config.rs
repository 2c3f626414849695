//! Lint session configuration.

use crate::diagnostics::Severity;
use crate::scheduler::{DEFAULT_DELAY, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Settings for one linting session. Missing fields take their defaults.
pub struct LintConfig {
    #[serde(default = "default_delay_ms")]
    /// Quiet period after the last edit before the source runs again, in milliseconds.
    pub delay_ms: u64,

    #[serde(default = "default_tolerance_ms")]
    /// How early a due timer may fire, in milliseconds.
    pub tolerance_ms: u64,

    #[serde(default)]
    /// Open the panel when diagnostics arrive and close it when they are cleared.
    pub auto_panel: bool,

    #[serde(default)]
    /// Diagnostics below this severity are dropped before anchoring.
    pub min_severity: Option<Severity>,
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY.as_millis() as u64
}

fn default_tolerance_ms() -> u64 {
    DEFAULT_TOLERANCE.as_millis() as u64
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            tolerance_ms: default_tolerance_ms(),
            auto_panel: false,
            min_severity: None,
        }
    }
}

impl LintConfig {
    /// Quiet period as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Fire tolerance as a [`Duration`].
    pub fn tolerance(&self) -> Duration {
        Duration::from_millis(self.tolerance_ms)
    }

    /// Returns `true` if diagnostics at `severity` pass the configured filter.
    pub fn accepts(&self, severity: Severity) -> bool {
        self.min_severity.is_none_or(|min| severity >= min)
    }
}
