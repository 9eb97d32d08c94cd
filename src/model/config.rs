use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration from an optional `traceline.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color overrides, e.g. `current_step = "#B38C00"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Auto-advance speed in items per second
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            speed: default_speed(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Grey out non-matched rows while a query is selected
    #[serde(default)]
    pub query_focus: bool,
}

fn default_speed() -> f64 {
    1.0
}
