use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

use super::domain::{
    DepartureReceipt, ParkingReceipt, Spot, SpotId, SpotType, Ticket, Vehicle, VehicleClass,
    VehicleId,
};
use super::error::ParkingError;
use super::events::{EventSink, ParkingEvent, TracingSink};
use super::fee::FeeStrategy;
use super::report::{LevelOccupancy, TypeOccupancy};

/// Number of spots of each type a level is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotCounts {
    pub handicap: usize,
    pub compact: usize,
    pub large: usize,
    pub motorcycle: usize,
}

impl SpotCounts {
    pub const fn new(handicap: usize, compact: usize, large: usize, motorcycle: usize) -> Self {
        Self {
            handicap,
            compact,
            large,
            motorcycle,
        }
    }

    pub const fn get(&self, spot_type: SpotType) -> usize {
        match spot_type {
            SpotType::Handicap => self.handicap,
            SpotType::Compact => self.compact,
            SpotType::Large => self.large,
            SpotType::Motorcycle => self.motorcycle,
        }
    }

    pub const fn total(&self) -> usize {
        self.handicap + self.compact + self.large + self.motorcycle
    }
}

/// A level turned away a vehicle. The vehicle is handed back so the caller
/// can offer it elsewhere.
#[derive(Debug)]
pub struct Rejected {
    pub vehicle: Vehicle,
    pub reason: ParkingError,
}

#[derive(Debug)]
struct Session {
    vehicle: Vehicle,
    ticket: Ticket,
}

/// One floor of the facility.
///
/// Spots are created once, in the order handicap, compact, large,
/// motorcycle. Each spot type has its own FIFO pool of free spot indices; a
/// spot sits in its pool exactly while it has no occupant.
pub struct Level {
    id: String,
    spots: Vec<Spot>,
    free: [VecDeque<usize>; 4],
    sessions: HashMap<VehicleId, Session>,
    tickets_issued: u64,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Level")
            .field("id", &self.id)
            .field("spots", &self.spots)
            .field("free", &self.free)
            .field("parked", &self.sessions.len())
            .finish()
    }
}

impl Level {
    pub fn new(id: impl Into<String>, counts: SpotCounts) -> Self {
        Self::with_sink(id, counts, Arc::new(TracingSink))
    }

    pub fn with_sink(id: impl Into<String>, counts: SpotCounts, sink: Arc<dyn EventSink>) -> Self {
        let id = id.into();
        let mut spots = Vec::with_capacity(counts.total());
        let mut free: [VecDeque<usize>; 4] = Default::default();

        for spot_type in SpotType::ordered() {
            for ordinal in 1..=counts.get(spot_type) {
                free[spot_type.index()].push_back(spots.len());
                spots.push(Spot::new(SpotId::mint(&id, spot_type, ordinal), spot_type));
            }
        }

        Self {
            id,
            spots,
            free,
            sessions: HashMap::new(),
            tickets_issued: 0,
            sink,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn total_spots(&self) -> usize {
        self.spots.len()
    }

    pub fn free_count(&self, spot_type: SpotType) -> usize {
        self.free[spot_type.index()].len()
    }

    pub fn occupied_count(&self) -> usize {
        self.spots.iter().filter(|spot| spot.is_occupied()).count()
    }

    /// Free spots of one type in the order they will be handed out.
    pub fn free_spots(&self, spot_type: SpotType) -> impl Iterator<Item = &Spot> + '_ {
        self.free[spot_type.index()]
            .iter()
            .map(move |&index| &self.spots[index])
    }

    pub fn is_parked(&self, vehicle: &VehicleId) -> bool {
        self.sessions.contains_key(vehicle)
    }

    /// Spot currently holding `vehicle`, if it is parked on this level.
    pub fn locate(&self, vehicle: &VehicleId) -> Option<&Spot> {
        if !self.is_parked(vehicle) {
            return None;
        }
        self.spots
            .iter()
            .find(|spot| spot.occupant() == Some(vehicle))
    }

    pub(crate) fn set_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sink = sink;
    }

    /// Takes the oldest free spot compatible with `class` and binds it to
    /// `occupant`. `None` means the pool for that spot type is empty.
    pub(crate) fn allocate(&mut self, class: VehicleClass, occupant: &VehicleId) -> Option<usize> {
        let index = self.free[class.required_spot().index()].pop_front()?;
        self.spots[index].occupy(occupant.clone());
        Some(index)
    }

    /// Clears the spot and returns it to the back of its type's pool.
    pub(crate) fn release(&mut self, index: usize) -> Result<VehicleId, ParkingError> {
        let spot = &mut self.spots[index];
        let vehicle = spot
            .vacate()
            .ok_or_else(|| ParkingError::InvalidRelease(spot.id().clone()))?;
        self.free[spot.spot_type().index()].push_back(index);
        Ok(vehicle)
    }

    pub fn park(
        &mut self,
        vehicle: Vehicle,
        now: DateTime<Utc>,
    ) -> Result<ParkingReceipt, Rejected> {
        if let Some(spot) = self.locate(vehicle.id()) {
            let reason = ParkingError::AlreadyParked {
                vehicle: vehicle.id().clone(),
                spot: spot.id().clone(),
            };
            return Err(Rejected { vehicle, reason });
        }

        let Some(index) = self.allocate(vehicle.class(), vehicle.id()) else {
            let reason = ParkingError::NoSpotAvailable {
                level: self.id.clone(),
                spot_type: vehicle.required_spot(),
            };
            debug!(level = %self.id, vehicle = %vehicle.id(), "no compatible spot on level");
            return Err(Rejected { vehicle, reason });
        };

        self.tickets_issued += 1;
        let ticket = Ticket {
            number: format!("{}-T{:06}", self.id, self.tickets_issued),
            issued_at: now,
        };
        let spot = &self.spots[index];
        let receipt = ParkingReceipt {
            vehicle: vehicle.id().clone(),
            level: self.id.clone(),
            spot: spot.id().clone(),
            spot_type: spot.spot_type(),
            ticket: ticket.clone(),
        };

        self.sessions
            .insert(vehicle.id().clone(), Session { vehicle, ticket });
        self.sink.emit(&ParkingEvent::Parked {
            vehicle: receipt.vehicle.clone(),
            spot: receipt.spot.clone(),
            ticket: receipt.ticket.number.clone(),
        });

        Ok(receipt)
    }

    pub fn depart(
        &mut self,
        vehicle: &VehicleId,
        now: DateTime<Utc>,
    ) -> Result<DepartureReceipt, ParkingError> {
        let index = self
            .spots
            .iter()
            .position(|spot| spot.occupant() == Some(vehicle))
            .ok_or_else(|| ParkingError::VehicleNotFound(vehicle.clone()))?;
        if !self.sessions.contains_key(vehicle) {
            return Err(ParkingError::VehicleNotFound(vehicle.clone()));
        }

        // The session is only dropped once the spot is back in its pool.
        self.release(index)?;
        let session = self
            .sessions
            .remove(vehicle)
            .ok_or_else(|| ParkingError::VehicleNotFound(vehicle.clone()))?;
        let fee = session
            .vehicle
            .rate()
            .calculate_fee(session.ticket.issued_at, now);

        let receipt = DepartureReceipt {
            vehicle: vehicle.clone(),
            class: session.vehicle.class(),
            level: self.id.clone(),
            spot: self.spots[index].id().clone(),
            ticket: session.ticket,
            departed_at: now,
            fee,
        };
        self.sink.emit(&ParkingEvent::Departed {
            vehicle: receipt.vehicle.clone(),
            spot: receipt.spot.clone(),
            fee,
        });

        Ok(receipt)
    }

    pub fn occupancy(&self) -> LevelOccupancy {
        let by_type = SpotType::ordered()
            .into_iter()
            .map(|spot_type| {
                let total = self
                    .spots
                    .iter()
                    .filter(|spot| spot.spot_type() == spot_type)
                    .count();
                let free = self.free_count(spot_type);
                TypeOccupancy {
                    spot_type,
                    spot_type_label: spot_type.label().to_string(),
                    total,
                    free,
                    occupied: total - free,
                }
            })
            .collect();

        LevelOccupancy {
            level: self.id.clone(),
            by_type,
        }
    }

    /// Checks that pool membership and occupancy agree: every pooled index is
    /// a free spot of the pool's type, no index is pooled twice, and every
    /// free spot is pooled.
    pub fn pools_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        for spot_type in SpotType::ordered() {
            for &index in &self.free[spot_type.index()] {
                let Some(spot) = self.spots.get(index) else {
                    return false;
                };
                if spot.spot_type() != spot_type || spot.is_occupied() || !seen.insert(index) {
                    return false;
                }
            }
        }

        let free_spots = self.spots.len() - self.occupied_count();
        seen.len() == free_spots && self.sessions.len() == self.occupied_count()
    }
}
