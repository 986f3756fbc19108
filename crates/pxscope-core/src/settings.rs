use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    navigation::DEFAULT_ROUTE,
    store::{overlay_field, Overlay},
};

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

const KNOWN_FIELDS: [&str; 6] = [
    "language",
    "timeout",
    "route",
    "scroll_speed",
    "scroll_smooth",
    "theme",
];

/// User preferences persisted under the `settings` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub language: String,
    /// Network timeout in seconds.
    pub timeout: u64,
    /// Route restored on the next launch.
    pub route: String,
    pub scroll_speed: f64,
    pub scroll_smooth: bool,
    pub theme: String,
    /// Keys written by other versions, kept so saving does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            route: DEFAULT_ROUTE.to_string(),
            scroll_speed: 1.0,
            scroll_smooth: true,
            theme: "default".to_string(),
            extra: Map::new(),
        }
    }
}

impl Settings {
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.saturating_mul(1000)
    }

    pub fn apply_patch(&mut self, patch: SettingsPatch) {
        let SettingsPatch {
            language,
            timeout,
            route,
            scroll_speed,
            scroll_smooth,
            theme,
        } = patch;

        if let Some(language) = language {
            self.language = language;
        }
        if let Some(timeout) = timeout {
            self.timeout = timeout;
        }
        if let Some(route) = route {
            self.route = route;
        }
        if let Some(scroll_speed) = scroll_speed {
            self.scroll_speed = scroll_speed;
        }
        if let Some(scroll_smooth) = scroll_smooth {
            self.scroll_smooth = scroll_smooth;
        }
        if let Some(theme) = theme {
            self.theme = theme;
        }
    }
}

impl Overlay for Settings {
    fn overlay(&mut self, value: Value) {
        let Value::Object(map) = value else {
            return;
        };

        overlay_field(&mut self.language, &map, "language");
        overlay_field(&mut self.timeout, &map, "timeout");
        overlay_field(&mut self.route, &map, "route");
        overlay_field(&mut self.scroll_speed, &map, "scroll_speed");
        overlay_field(&mut self.scroll_smooth, &map, "scroll_smooth");
        overlay_field(&mut self.theme, &map, "theme");

        for (key, field) in map {
            if !KNOWN_FIELDS.contains(&key.as_str()) {
                self.extra.insert(key, field);
            }
        }
    }
}

/// Partial update sent by the settings screen; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub language: Option<String>,
    pub timeout: Option<u64>,
    pub route: Option<String>,
    pub scroll_speed: Option<f64>,
    pub scroll_smooth: Option<bool>,
    pub theme: Option<String>,
}
