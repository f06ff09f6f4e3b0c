use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::VehicleClass;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Maps a parking session's elapsed time onto a charge.
pub trait FeeStrategy {
    fn calculate_fee(&self, entry: DateTime<Utc>, now: DateTime<Utc>) -> f64;
}

/// Linear hourly billing: partial hours are charged proportionally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyRate {
    per_hour: f64,
}

impl HourlyRate {
    pub const fn new(per_hour: f64) -> Self {
        Self { per_hour }
    }

    pub fn per_hour(&self) -> f64 {
        self.per_hour
    }
}

impl FeeStrategy for HourlyRate {
    fn calculate_fee(&self, entry: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let elapsed_ms = (now - entry).num_milliseconds().max(0);
        let hours = elapsed_ms as f64 / MILLIS_PER_HOUR;
        self.per_hour * hours
    }
}

/// Hourly rate per vehicle class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub handicap: f64,
    pub bike: f64,
    pub car: f64,
    pub bus: f64,
}

impl FeeSchedule {
    pub const fn standard() -> Self {
        Self {
            handicap: 1.0,
            bike: 2.5,
            car: 5.0,
            bus: 10.0,
        }
    }

    pub fn rate(&self, class: VehicleClass) -> f64 {
        match class {
            VehicleClass::Handicap => self.handicap,
            VehicleClass::Bike => self.bike,
            VehicleClass::Car => self.car,
            VehicleClass::Bus => self.bus,
        }
    }

    pub fn set_rate(&mut self, class: VehicleClass, per_hour: f64) {
        let slot = match class {
            VehicleClass::Handicap => &mut self.handicap,
            VehicleClass::Bike => &mut self.bike,
            VehicleClass::Car => &mut self.car,
            VehicleClass::Bus => &mut self.bus,
        };
        *slot = per_hour;
    }

    pub fn strategy_for(&self, class: VehicleClass) -> HourlyRate {
        HourlyRate::new(self.rate(class))
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}
