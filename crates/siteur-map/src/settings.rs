use serde::{Deserialize, Serialize};
use siteur::data::DEFAULT_ANCHOR_STATION;
use siteur::{LatLng, LineId};
use std::path::Path;

/// Optional settings file read from the working directory.
pub const SETTINGS_FILE: &str = "siteur-map.json";

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Startup configuration. Every field has a default, so a settings
/// file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    /// Zoom used when focusing a station or a location fix.
    pub station_zoom: f64,
    pub tile_url: String,
    pub tile_subdomains: Vec<String>,
    pub tile_attribution: String,
    /// Station whose drag moves its whole line; `null` disables group
    /// drags.
    pub anchor_station: Option<String>,
    pub visible_lines: Vec<LineId>,
    pub assistant_model: String,
    pub assistant_endpoint: String,
    /// Environment variables searched, in order, for the API key.
    pub api_key_env: Vec<String>,
    pub location_poll_secs: u64,
    pub copy_indicator_secs: f64,
    /// Windows narrower than this use the compact layout.
    pub compact_breakpoint: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_center: LatLng::new(20.6749, -103.3533),
            initial_zoom: 13.0,
            station_zoom: 16.0,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
                .to_string(),
            tile_subdomains: vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
            ],
            tile_attribution: "© OpenStreetMap contributors".to_string(),
            anchor_station: Some(DEFAULT_ANCHOR_STATION.to_string()),
            visible_lines: vec![
                LineId::Number(1),
                LineId::Number(2),
                LineId::Number(3),
                LineId::Number(4),
                LineId::code("mc"),
                LineId::code("mp"),
            ],
            assistant_model: "gemini-3-flash-preview".to_string(),
            assistant_endpoint:
                "https://generativelanguage.googleapis.com/v1beta"
                    .to_string(),
            api_key_env: vec![
                "GEMINI_API_KEY".to_string(),
                "API_KEY".to_string(),
            ],
            location_poll_secs: 30,
            copy_indicator_secs: 3.0,
            compact_breakpoint: 768.0,
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Read `SETTINGS_FILE` if present; fall back to defaults on any
    /// problem.
    pub fn load_or_default() -> Self {
        let path = Path::new(SETTINGS_FILE);
        if cfg!(target_arch = "wasm32") || !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                log::info!("loaded settings from {}", SETTINGS_FILE);
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// API key for the assistant, from the runtime environment or, on
    /// the web, from the build environment.
    pub fn api_key(&self) -> Option<String> {
        runtime_key(&self.api_key_env).or_else(|| {
            option_env!("GEMINI_API_KEY")
                .or(option_env!("API_KEY"))
                .map(str::to_string)
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_key(names: &[String]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn runtime_key(_names: &[String]) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings = Settings::from_json(
            r#"{ "initial_zoom": 12, "anchor_station": null,
                 "visible_lines": [1, "mc"] }"#,
        )
        .unwrap();
        assert_eq!(settings.initial_zoom, 12.0);
        assert_eq!(settings.anchor_station, None);
        assert_eq!(
            settings.visible_lines,
            vec![LineId::Number(1), LineId::code("mc")]
        );
        assert_eq!(settings.station_zoom, 16.0);
        assert_eq!(settings.assistant_model, "gemini-3-flash-preview");
    }

    #[test]
    fn test_center_is_read_as_lat_lng_object() {
        let settings = Settings::from_json(
            r#"{ "initial_center": { "lat": 20.7, "lng": -103.4 } }"#,
        )
        .unwrap();
        assert_eq!(settings.initial_center, LatLng::new(20.7, -103.4));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ initial_zoom: 12 }"),
            Err(SettingsError::Json(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "initial_zoom": "high" }"#),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_defaults_round_trip_through_json() {
        let text = serde_json::to_string(&Settings::default()).unwrap();
        assert_eq!(Settings::from_json(&text).unwrap(), Settings::default());
    }
}
