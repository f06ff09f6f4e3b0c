use super::domain::{SpotId, SpotType, VehicleId};

/// Negative outcomes of parking operations. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParkingError {
    #[error("level {level} has no free {spot_type} spot")]
    NoSpotAvailable { level: String, spot_type: SpotType },
    #[error("parking full for {vehicle}")]
    LotFull { vehicle: VehicleId },
    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),
    #[error("vehicle {vehicle} is already parked at {spot}")]
    AlreadyParked { vehicle: VehicleId, spot: SpotId },
    #[error("spot {0} is already free")]
    InvalidRelease(SpotId),
}
