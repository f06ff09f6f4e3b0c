use crate::config::ConfigError;
use crate::facility::{ClockOverflow, LayoutError, ParkingError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Layout(LayoutError),
    Parking(ParkingError),
    Clock(ClockOverflow),
    InvalidDwell(i64),
    Render(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Layout(err) => write!(f, "layout error: {}", err),
            AppError::Parking(err) => write!(f, "parking error: {}", err),
            AppError::Clock(err) => write!(f, "clock error: {}", err),
            AppError::InvalidDwell(minutes) => {
                write!(f, "dwell minutes out of range: {}", minutes)
            }
            AppError::Render(err) => write!(f, "render error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Layout(err) => Some(err),
            AppError::Parking(err) => Some(err),
            AppError::Clock(err) => Some(err),
            AppError::InvalidDwell(_) => None,
            AppError::Render(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<LayoutError> for AppError {
    fn from(value: LayoutError) -> Self {
        Self::Layout(value)
    }
}

impl From<ParkingError> for AppError {
    fn from(value: ParkingError) -> Self {
        Self::Parking(value)
    }
}

impl From<ClockOverflow> for AppError {
    fn from(value: ClockOverflow) -> Self {
        Self::Clock(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}
