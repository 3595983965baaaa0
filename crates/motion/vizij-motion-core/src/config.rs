//! Core configuration for vizij-motion-core.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Engine defaults. Keep this minimal; expand without breaking API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Duration used when a descriptor omits one or gives a zero/invalid value.
    pub default_duration_ms: f64,
    /// Delay used when a descriptor omits one.
    pub default_delay_ms: f64,
    /// Easing name used when a descriptor omits one.
    pub default_easing: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration_ms: 500.0,
            default_delay_ms: 0.0,
            default_easing: "linear".to_string(),
        }
    }
}

impl Config {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
