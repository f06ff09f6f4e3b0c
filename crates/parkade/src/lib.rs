pub mod config;
pub mod error;
pub mod facility;
pub mod telemetry;
