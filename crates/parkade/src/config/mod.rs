use crate::facility::{FeeSchedule, LayoutError, LotLayout, SpotCounts, VehicleClass};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the facility.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub layout: LayoutSource,
    pub fees: FeeSchedule,
}

/// Level ids used when neither a layout file nor `PARKADE_LEVELS` is given.
pub const DEFAULT_LEVELS: &str = "L1,L2";
/// Per-level spot counts (handicap,compact,large,motorcycle) used when
/// `PARKADE_SPOTS` is unset.
pub const DEFAULT_SPOTS: &str = "5,20,10,10";

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("PARKADE_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("PARKADE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let layout = match env::var("PARKADE_LAYOUT") {
            Ok(path) if !path.trim().is_empty() => LayoutSource::Csv(PathBuf::from(path.trim())),
            _ => {
                let levels = parse_levels(
                    &env::var("PARKADE_LEVELS").unwrap_or_else(|_| DEFAULT_LEVELS.to_string()),
                )?;
                let counts = parse_spot_counts(
                    &env::var("PARKADE_SPOTS").unwrap_or_else(|_| DEFAULT_SPOTS.to_string()),
                )?;
                LayoutSource::Uniform { levels, counts }
            }
        };

        let mut fees = FeeSchedule::standard();
        for class in VehicleClass::ordered() {
            let key = rate_key(class);
            if let Ok(raw) = env::var(&key) {
                fees.set_rate(class, parse_rate(&key, &raw)?);
            }
        }

        Ok(Self {
            environment,
            telemetry: TelemetryConfig {
                log_level,
                ansi: false,
            },
            layout,
            fees,
        })
    }
}

/// Where the level layout comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    Uniform {
        levels: Vec<String>,
        counts: SpotCounts,
    },
    Csv(PathBuf),
}

impl LayoutSource {
    pub fn resolve(&self) -> Result<LotLayout, LayoutError> {
        match self {
            LayoutSource::Uniform { levels, counts } => {
                LotLayout::uniform(levels.iter().cloned(), *counts)
            }
            LayoutSource::Csv(path) => LotLayout::from_path(path),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

fn rate_key(class: VehicleClass) -> String {
    format!("PARKADE_RATE_{}", class.label().to_ascii_uppercase())
}

fn parse_rate(key: &str, raw: &str) -> Result<f64, ConfigError> {
    let invalid = || ConfigError::InvalidRate {
        key: key.to_string(),
        value: raw.to_string(),
    };
    let rate = raw.trim().parse::<f64>().map_err(|_| invalid())?;
    if !rate.is_finite() || rate < 0.0 {
        return Err(invalid());
    }
    Ok(rate)
}

pub fn parse_levels(raw: &str) -> Result<Vec<String>, ConfigError> {
    let levels: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    if levels.is_empty() {
        return Err(ConfigError::InvalidLevels);
    }
    Ok(levels)
}

/// Parses `handicap,compact,large,motorcycle`.
pub fn parse_spot_counts(raw: &str) -> Result<SpotCounts, ConfigError> {
    let invalid = || ConfigError::InvalidSpotCounts(raw.to_string());
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<usize>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    let [handicap, compact, large, motorcycle] = values.as_slice() else {
        return Err(invalid());
    };
    Ok(SpotCounts::new(*handicap, *compact, *large, *motorcycle))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidRate { key: String, value: String },
    InvalidSpotCounts(String),
    InvalidLevels,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRate { key, value } => {
                write!(f, "{key} must be a non-negative number, got '{value}'")
            }
            ConfigError::InvalidSpotCounts(value) => write!(
                f,
                "PARKADE_SPOTS must be four non-negative integers (handicap,compact,large,motorcycle), got '{value}'"
            ),
            ConfigError::InvalidLevels => {
                write!(f, "PARKADE_LEVELS must name at least one level")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "PARKADE_ENV",
            "PARKADE_LOG_LEVEL",
            "PARKADE_LAYOUT",
            "PARKADE_LEVELS",
            "PARKADE_SPOTS",
            "PARKADE_RATE_HANDICAP",
            "PARKADE_RATE_BIKE",
            "PARKADE_RATE_CAR",
            "PARKADE_RATE_BUS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.fees, FeeSchedule::standard());
        assert_eq!(
            config.layout,
            LayoutSource::Uniform {
                levels: vec!["L1".to_string(), "L2".to_string()],
                counts: SpotCounts::new(5, 20, 10, 10),
            }
        );
    }

    #[test]
    fn rate_overrides_apply_per_class() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PARKADE_RATE_BIKE", "2.0");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.fees.rate(VehicleClass::Bike), 2.0);
        assert_eq!(config.fees.rate(VehicleClass::Car), 5.0);
        reset_env();
    }

    #[test]
    fn negative_rates_are_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PARKADE_RATE_BUS", "-3");
        let error = AppConfig::load().expect_err("negative rate rejected");
        assert!(matches!(
            error,
            ConfigError::InvalidRate { ref key, .. } if key == "PARKADE_RATE_BUS"
        ));
        reset_env();
    }

    #[test]
    fn layout_path_takes_precedence() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PARKADE_LAYOUT", "garage.csv");
        env::set_var("PARKADE_LEVELS", "A,B,C");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.layout, LayoutSource::Csv(PathBuf::from("garage.csv")));
        reset_env();
    }

    #[test]
    fn spot_counts_need_four_values() {
        assert_eq!(
            parse_spot_counts(" 1, 2,3 ,4").expect("valid counts"),
            SpotCounts::new(1, 2, 3, 4)
        );
        assert!(parse_spot_counts("1,2,3").is_err());
        assert!(parse_spot_counts("1,2,x,4").is_err());
        assert!(parse_levels(" , ").is_err());
    }
}
