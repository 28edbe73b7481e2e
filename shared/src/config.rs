pub const DEFAULT_SERVER_ID: &str = "default";
pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_REFRESH_INTERVAL_MS: u32 = 5_000;
pub const DEFAULT_COUNTDOWN_SECS: u8 = 5;
pub const DEFAULT_HIT_RADIUS_PX: f64 = 20.0;
pub const COUNTDOWN_INTERVAL_MS: u32 = 1_000;

/// Runtime settings for one map view session.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub server_id: String,
    pub api_base: String,
    pub refresh_interval_ms: u32,
    pub countdown_secs: u8,
    pub hit_radius_px: f64,
    pub debug: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            server_id: DEFAULT_SERVER_ID.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            hit_radius_px: DEFAULT_HIT_RADIUS_PX,
            debug: false,
        }
    }
}

impl MapConfig {
    /// Build from a key lookup (the page query string in the browser).
    /// Missing or invalid values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server_id = lookup("server")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ID.to_string());

        let api_base = lookup("api")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let refresh_interval_ms = lookup("refresh_ms")
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|value| *value >= 250)
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_MS);

        let countdown_secs = lookup("countdown")
            .and_then(|value| value.trim().parse::<u8>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_COUNTDOWN_SECS);

        let hit_radius_px = lookup("hit_radius")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value > 0.0)
            .unwrap_or(DEFAULT_HIT_RADIUS_PX);

        let debug = lookup("debug")
            .map(|value| {
                let normalized = value.trim().to_ascii_lowercase();
                matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
            })
            .unwrap_or(false);

        Self {
            server_id,
            api_base,
            refresh_interval_ms,
            countdown_secs,
            hit_radius_px,
            debug,
        }
    }

    pub fn snapshot_url(&self) -> String {
        format!("{}/servers/{}/map", self.api_base, self.server_id)
    }

    pub fn command_url(&self, entity_id: &str, action: &str) -> String {
        format!(
            "{}/servers/{}/players/{}/{}",
            self.api_base, self.server_id, entity_id, action
        )
    }
}
