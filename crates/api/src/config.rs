use fleetwatch_core::conversion::TemperatureStrategy;
use fleetwatch_core::error::CoreError;
use fleetwatch_core::thresholds::ThresholdConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal
    /// (default: `30`).
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            request_timeout_secs,
            shutdown_timeout_secs,
        }
    }
}

/// Telemetry processing configuration: how raw samples are converted and
/// which ranges raise alerts. Loaded once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub temperature_strategy: TemperatureStrategy,
    pub thresholds: ThresholdConfig,
}

impl TelemetryConfig {
    /// Load from environment variables, panicking on invalid values.
    ///
    /// | Env Var                  | Default                                       |
    /// |--------------------------|-----------------------------------------------|
    /// | `TEMPERATURE_STRATEGY`   | `offset55` (`celsius` also accepted)          |
    /// | `DEVICE_DATA_THRESHOLDS` | temperature 5–35, humidity 30–70, pressure 95–105 |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
            .unwrap_or_else(|e| panic!("Invalid telemetry configuration: {e}"))
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// A set `DEVICE_DATA_THRESHOLDS` replaces the default ranges entirely.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let temperature_strategy = match non_empty("TEMPERATURE_STRATEGY") {
            Some(value) => value.parse()?,
            None => TemperatureStrategy::default(),
        };

        let thresholds = match non_empty("DEVICE_DATA_THRESHOLDS") {
            Some(json) => ThresholdConfig::from_json(&json)?,
            None => ThresholdConfig::defaults(),
        };

        Ok(Self {
            temperature_strategy,
            thresholds,
        })
    }
}
