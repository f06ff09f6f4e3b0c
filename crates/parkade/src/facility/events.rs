use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use super::domain::{SpotId, VehicleId};

/// Narration emitted by the lot as sessions start and end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ParkingEvent {
    Parked {
        vehicle: VehicleId,
        spot: SpotId,
        ticket: String,
    },
    Departed {
        vehicle: VehicleId,
        spot: SpotId,
        fee: f64,
    },
    LotFull {
        vehicle: VehicleId,
    },
    AlreadyParked {
        vehicle: VehicleId,
        spot: SpotId,
    },
    NotFound {
        vehicle: VehicleId,
    },
}

impl fmt::Display for ParkingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParkingEvent::Parked { vehicle, spot, .. } => {
                write!(f, "vehicle {vehicle} parked at spot {spot}")
            }
            ParkingEvent::Departed { vehicle, spot, fee } => {
                write!(f, "vehicle {vehicle} departed from spot {spot}, fee={fee:.2}")
            }
            ParkingEvent::LotFull { vehicle } => write!(f, "parking full for {vehicle}"),
            ParkingEvent::AlreadyParked { vehicle, spot } => {
                write!(f, "vehicle {vehicle} is already parked at spot {spot}")
            }
            ParkingEvent::NotFound { vehicle } => write!(f, "vehicle {vehicle} not found"),
        }
    }
}

/// Receives every event the lot produces. Emission is fire-and-forget.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ParkingEvent);
}

/// Default sink: structured log lines only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &ParkingEvent) {
        match event {
            ParkingEvent::Parked {
                vehicle,
                spot,
                ticket,
            } => info!(%vehicle, %spot, %ticket, "vehicle parked"),
            ParkingEvent::Departed { vehicle, spot, fee } => {
                info!(%vehicle, %spot, fee, "vehicle departed")
            }
            ParkingEvent::LotFull { vehicle } => warn!(%vehicle, "parking full"),
            ParkingEvent::AlreadyParked { vehicle, spot } => {
                warn!(%vehicle, %spot, "vehicle already parked")
            }
            ParkingEvent::NotFound { vehicle } => warn!(%vehicle, "vehicle not found"),
        }
    }
}

/// Collects events in memory; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventLog {
    events: Arc<Mutex<Vec<ParkingEvent>>>,
}

impl InMemoryEventLog {
    pub fn events(&self) -> Vec<ParkingEvent> {
        self.events.lock().expect("event log mutex poisoned").clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<ParkingEvent> {
        std::mem::take(&mut *self.events.lock().expect("event log mutex poisoned"))
    }
}

impl EventSink for InMemoryEventLog {
    fn emit(&self, event: &ParkingEvent) {
        TracingSink.emit(event);
        self.events
            .lock()
            .expect("event log mutex poisoned")
            .push(event.clone());
    }
}
