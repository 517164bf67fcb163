//! Configuration management for custdash
//!
//! This module handles loading, validation, and management of
//! custdash configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Where customer and transaction records come from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Remote JSON endpoint
    Http,
    /// Local directory holding customers.json and transactions.json
    File,
}

impl Default for SourceKind {
    fn default() -> Self {
        SourceKind::Http
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(SourceKind::Http),
            "file" => Ok(SourceKind::File),
            _ => Err(format!("Invalid source kind: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Http => write!(f, "http"),
            SourceKind::File => write!(f, "file"),
        }
    }
}

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Base URL of the remote endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_customers_path")]
    pub customers_path: String,
    #[serde(default = "default_transactions_path")]
    pub transactions_path: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory for the file source
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            base_url: default_base_url(),
            customers_path: default_customers_path(),
            transactions_path: default_transactions_path(),
            timeout_secs: default_timeout_secs(),
            data_dir: None,
        }
    }
}

impl SourceConfig {
    /// Full URL of the customers endpoint
    pub fn customers_url(&self) -> String {
        join_url(&self.base_url, &self.customers_path)
    }

    /// Full URL of the transactions endpoint
    pub fn transactions_url(&self) -> String {
        join_url(&self.base_url, &self.transactions_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn default_base_url() -> String {
    "https://route-json.vercel.app".to_string()
}

fn default_customers_path() -> String {
    "/customers".to_string()
}

fn default_transactions_path() -> String {
    "/transactions".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Chart settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// SVG width in pixels
    #[serde(default = "default_chart_width")]
    pub width: u32,
    /// SVG height in pixels
    #[serde(default = "default_chart_height")]
    pub height: u32,
    /// Line colour as #rrggbb
    #[serde(default = "default_line_color")]
    pub line_color: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
            line_color: default_line_color(),
        }
    }
}

impl ChartConfig {
    /// Parse `line_color` into RGB components
    pub fn line_rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex_color(&self.line_color)
    }
}

fn default_chart_width() -> u32 {
    640
}

fn default_chart_height() -> u32 {
    320
}

fn default_line_color() -> String {
    "#4f46e5".to_string()
}

/// Parse a `#rrggbb` colour
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,
    /// Number of decimal places shown for totals
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_currency_symbol(),
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Chart settings
    #[serde(default)]
    pub chart: ChartConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.source.timeout_secs == 0 || self.source.timeout_secs > 300 {
            return Err(ConfigError::InvalidValue {
                field: "source.timeout_secs".to_string(),
                reason: "Timeout must be between 1 and 300 seconds".to_string(),
            });
        }

        match self.source.kind {
            SourceKind::Http => {
                if !(self.source.base_url.starts_with("http://")
                    || self.source.base_url.starts_with("https://"))
                {
                    return Err(ConfigError::InvalidValue {
                        field: "source.base_url".to_string(),
                        reason: "Base URL must start with http:// or https://".to_string(),
                    });
                }
            }
            SourceKind::File => {
                if self.source.data_dir.is_none() {
                    return Err(ConfigError::MissingField {
                        field: "source.data_dir".to_string(),
                    });
                }
            }
        }

        for (field, value) in [("chart.width", self.chart.width), ("chart.height", self.chart.height)] {
            if !(100..=4000).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "Chart dimensions must be between 100 and 4000 pixels".to_string(),
                });
            }
        }

        if self.chart.line_rgb().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "chart.line_color".to_string(),
                reason: "Line colour must look like #rrggbb".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.source.kind, SourceKind::Http);
        assert_eq!(config.source.customers_url(), "https://route-json.vercel.app/customers");
        assert_eq!(config.source.transactions_url(), "https://route-json.vercel.app/transactions");
        assert_eq!(config.currency.symbol, "$");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.chart.width, 640);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.source.timeout_secs, 10);
    }

    #[test]
    fn test_url_joining_ignores_extra_slashes() {
        let source = SourceConfig {
            base_url: "http://localhost:3000/".to_string(),
            customers_path: "customers".to_string(),
            ..SourceConfig::default()
        };
        assert_eq!(source.customers_url(), "http://localhost:3000/customers");
    }

    #[test]
    fn test_file_source_requires_data_dir() {
        let err = Config::from_yaml("source:\n  kind: file\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field } if field == "source.data_dir"));

        let config = Config::from_yaml("source:\n  kind: file\n  data_dir: ./fixtures\n").unwrap();
        assert_eq!(config.source.data_dir, Some(PathBuf::from("./fixtures")));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_yaml("server:\n  port: 0\n").is_err());
        assert!(Config::from_yaml("source:\n  timeout_secs: 0\n").is_err());
        assert!(Config::from_yaml("source:\n  base_url: ftp://example.com\n").is_err());
        assert!(Config::from_yaml("chart:\n  width: 20\n").is_err());
        assert!(Config::from_yaml("chart:\n  line_color: blue\n").is_err());
        assert!(Config::from_yaml("currency:\n  decimal_places: 11\n").is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#4f46e5"), Some((0x4f, 0x46, 0xe5)));
        assert_eq!(parse_hex_color("4f46e5"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("HTTP".parse::<SourceKind>().unwrap(), SourceKind::Http);
        assert_eq!("file".parse::<SourceKind>().unwrap(), SourceKind::File);
        assert!("ftp".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "logging:\n  level: debug").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.logging.level, "debug");

        let missing = dir.path().join("absent.yaml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::IoError { .. })));
        assert_eq!(Config::load_or_default(&missing).unwrap().server.port, 8080);
    }
}
