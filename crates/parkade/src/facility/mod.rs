//! Spot allocation, ticketing, and fee computation for a multi-level lot.

pub mod clock;
pub mod domain;
mod error;
pub mod events;
pub mod fee;
mod layout;
mod level;
mod lot;
pub mod report;

pub use clock::{Clock, ClockOverflow, ManualClock, SystemClock};
pub use domain::{
    DepartureReceipt, ParkingReceipt, Spot, SpotId, SpotType, Ticket, Vehicle, VehicleClass,
    VehicleId,
};
pub use error::ParkingError;
pub use events::{EventSink, InMemoryEventLog, ParkingEvent, TracingSink};
pub use fee::{FeeSchedule, FeeStrategy, HourlyRate};
pub use layout::{LayoutError, LevelLayout, LotLayout};
pub use level::{Level, Rejected, SpotCounts};
pub use lot::Lot;
pub use report::{LevelOccupancy, OccupancyReport, TypeOccupancy};
