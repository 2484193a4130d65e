use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub panel: PanelConfig,
    pub gestures: GestureConfig,
    pub connection: ConnectionConfig,
}

impl Config {
    /// Load configuration from the default path or create it with defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, writing defaults on first run
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/touchpanel/config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Control server host
    pub host: String,
    /// Control server websocket port
    pub port: u16,
}

impl ServerConfig {
    /// Websocket endpoint derived from host and port
    pub fn websocket_url(&self) -> String {
        format!("ws://{}:{}/", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9002,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Columns used by the flattened portrait grid
    pub portrait_columns: usize,
    /// Quiescence window before a resize triggers a re-layout
    pub resize_debounce_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            portrait_columns: 3,
            resize_debounce_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum horizontal travel for a completed swipe to change page
    pub swipe_threshold_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Delay before the single reconnect attempt after a drop
    pub reconnect_delay_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.server.port, 9002);
        assert_eq!(parsed.panel.portrait_columns, 3);
        assert_eq!(parsed.panel.resize_debounce_ms, 250);
        assert_eq!(parsed.gestures.swipe_threshold_px, 50.0);
        assert_eq!(parsed.connection.reconnect_delay_secs, 5);
    }

    #[test]
    fn test_partial_file_fills_missing_sections() {
        let parsed: Config = toml::from_str("[server]\nhost = \"panel.local\"\n").unwrap();
        assert_eq!(parsed.server.host, "panel.local");
        assert_eq!(parsed.server.port, 9002);
        assert_eq!(parsed.connection.reconnect_delay_secs, 5);
    }

    #[test]
    fn test_websocket_url() {
        let server = ServerConfig {
            host: "panel.local".into(),
            port: 9002,
        };
        assert_eq!(server.websocket_url(), "ws://panel.local:9002/");
    }
}
