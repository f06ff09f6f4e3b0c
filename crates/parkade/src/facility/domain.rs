use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::fee::{FeeSchedule, HourlyRate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Handicap,
    Bike,
    Car,
    Bus,
}

impl VehicleClass {
    pub const fn ordered() -> [Self; 4] {
        [Self::Handicap, Self::Bike, Self::Car, Self::Bus]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Handicap => "Handicap",
            Self::Bike => "Bike",
            Self::Car => "Car",
            Self::Bus => "Bus",
        }
    }

    /// The only spot type a vehicle of this class may occupy.
    pub const fn required_spot(self) -> SpotType {
        match self {
            Self::Handicap => SpotType::Handicap,
            Self::Bike => SpotType::Motorcycle,
            Self::Car => SpotType::Compact,
            Self::Bus => SpotType::Large,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotType {
    Handicap,
    Compact,
    Large,
    Motorcycle,
}

impl SpotType {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Handicap,
            Self::Compact,
            Self::Large,
            Self::Motorcycle,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Handicap => "Handicap",
            Self::Compact => "Compact",
            Self::Large => "Large",
            Self::Motorcycle => "Motorcycle",
        }
    }

    /// Prefix used when minting spot ids, e.g. `L1-C3`.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Handicap => "H",
            Self::Compact => "C",
            Self::Large => "L",
            Self::Motorcycle => "M",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Handicap => 0,
            Self::Compact => 1,
            Self::Large => 2,
            Self::Motorcycle => 3,
        }
    }
}

impl fmt::Display for SpotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// License plate or any other caller-chosen identity for a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for VehicleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(pub String);

impl SpotId {
    pub(crate) fn mint(level: &str, spot_type: SpotType, ordinal: usize) -> Self {
        Self(format!("{level}-{}{ordinal}", spot_type.code()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vehicle arriving at the facility. The hourly rate is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: VehicleId,
    class: VehicleClass,
    rate: HourlyRate,
}

impl Vehicle {
    /// Creates a vehicle billed at the standard rate for its class.
    pub fn new(id: impl Into<VehicleId>, class: VehicleClass) -> Self {
        Self::with_schedule(id, class, &FeeSchedule::standard())
    }

    pub fn with_schedule(
        id: impl Into<VehicleId>,
        class: VehicleClass,
        schedule: &FeeSchedule,
    ) -> Self {
        Self {
            id: id.into(),
            class,
            rate: schedule.strategy_for(class),
        }
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn class(&self) -> VehicleClass {
        self.class
    }

    pub fn rate(&self) -> &HourlyRate {
        &self.rate
    }

    pub fn required_spot(&self) -> SpotType {
        self.class.required_spot()
    }
}

/// Proof of entry handed out when a vehicle is assigned a spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub number: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spot {
    id: SpotId,
    spot_type: SpotType,
    occupant: Option<VehicleId>,
}

impl Spot {
    pub(crate) fn new(id: SpotId, spot_type: SpotType) -> Self {
        Self {
            id,
            spot_type,
            occupant: None,
        }
    }

    pub fn id(&self) -> &SpotId {
        &self.id
    }

    pub fn spot_type(&self) -> SpotType {
        self.spot_type
    }

    pub fn occupant(&self) -> Option<&VehicleId> {
        self.occupant.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub(crate) fn occupy(&mut self, vehicle: VehicleId) {
        debug_assert!(self.occupant.is_none(), "spot {} double-booked", self.id);
        self.occupant = Some(vehicle);
    }

    pub(crate) fn vacate(&mut self) -> Option<VehicleId> {
        self.occupant.take()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkingReceipt {
    pub vehicle: VehicleId,
    pub level: String,
    pub spot: SpotId,
    pub spot_type: SpotType,
    pub ticket: Ticket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureReceipt {
    pub vehicle: VehicleId,
    pub class: VehicleClass,
    pub level: String,
    pub spot: SpotId,
    pub ticket: Ticket,
    pub departed_at: DateTime<Utc>,
    pub fee: f64,
}
