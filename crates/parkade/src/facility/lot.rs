use std::sync::Arc;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::domain::{DepartureReceipt, ParkingReceipt, Spot, Vehicle, VehicleClass, VehicleId};
use super::error::ParkingError;
use super::events::{EventSink, ParkingEvent, TracingSink};
use super::fee::FeeSchedule;
use super::layout::LotLayout;
use super::level::Level;
use super::report::OccupancyReport;

/// The whole facility: levels in configured order plus the shared clock,
/// fee table, and event sink.
pub struct Lot {
    levels: Vec<Level>,
    fees: FeeSchedule,
    clock: Box<dyn Clock>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for Lot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lot")
            .field("levels", &self.levels)
            .field("fees", &self.fees)
            .finish_non_exhaustive()
    }
}

impl Lot {
    pub fn new(layout: &LotLayout) -> Self {
        let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
        let levels = layout
            .levels()
            .iter()
            .map(|level| Level::with_sink(level.id.clone(), level.counts, sink.clone()))
            .collect();

        Self {
            levels,
            fees: FeeSchedule::standard(),
            clock: Box::new(SystemClock),
            sink,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        let sink: Arc<dyn EventSink> = Arc::new(sink);
        for level in &mut self.levels {
            level.set_sink(sink.clone());
        }
        self.sink = sink;
        self
    }

    /// Sets the rates used by [`Lot::vehicle`]. A vehicle carries its rate
    /// from construction, so one built with [`Vehicle::new`] keeps the
    /// standard rate no matter which schedule the lot holds.
    pub fn with_fee_schedule(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Builds a vehicle priced with this lot's fee schedule.
    pub fn vehicle(&self, id: impl Into<VehicleId>, class: VehicleClass) -> Vehicle {
        Vehicle::with_schedule(id, class, &self.fees)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, id: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.id() == id)
    }

    pub fn locate(&self, vehicle: &VehicleId) -> Option<(&Level, &Spot)> {
        self.levels
            .iter()
            .find_map(|level| level.locate(vehicle).map(|spot| (level, spot)))
    }

    pub fn is_parked(&self, vehicle: &VehicleId) -> bool {
        self.levels.iter().any(|level| level.is_parked(vehicle))
    }

    pub fn parked_count(&self) -> usize {
        self.levels.iter().map(Level::occupied_count).sum()
    }

    /// Offers the vehicle to each level in order; the first level with a
    /// compatible free spot takes it. A vehicle nobody accepts is dropped.
    pub fn park(&mut self, vehicle: Vehicle) -> Result<ParkingReceipt, ParkingError> {
        if let Some((_, spot)) = self.locate(vehicle.id()) {
            let (vehicle, spot) = (vehicle.id().clone(), spot.id().clone());
            self.sink.emit(&ParkingEvent::AlreadyParked {
                vehicle: vehicle.clone(),
                spot: spot.clone(),
            });
            return Err(ParkingError::AlreadyParked { vehicle, spot });
        }

        let now = self.clock.now();
        let mut vehicle = vehicle;
        for level in &mut self.levels {
            match level.park(vehicle, now) {
                Ok(receipt) => return Ok(receipt),
                Err(rejected) => {
                    debug!(reason = %rejected.reason, "trying next level");
                    vehicle = rejected.vehicle;
                }
            }
        }

        let id = vehicle.id().clone();
        drop(vehicle);
        self.sink.emit(&ParkingEvent::LotFull {
            vehicle: id.clone(),
        });
        Err(ParkingError::LotFull { vehicle: id })
    }

    pub fn remove(&mut self, vehicle: &VehicleId) -> Result<DepartureReceipt, ParkingError> {
        let now = self.clock.now();
        for level in &mut self.levels {
            match level.depart(vehicle, now) {
                Ok(receipt) => return Ok(receipt),
                Err(ParkingError::VehicleNotFound(_)) => continue,
                Err(other) => return Err(other),
            }
        }

        self.sink.emit(&ParkingEvent::NotFound {
            vehicle: vehicle.clone(),
        });
        Err(ParkingError::VehicleNotFound(vehicle.clone()))
    }

    pub fn occupancy(&self) -> OccupancyReport {
        OccupancyReport {
            levels: self.levels.iter().map(Level::occupancy).collect(),
            parked_vehicles: self.parked_count(),
        }
    }
}
