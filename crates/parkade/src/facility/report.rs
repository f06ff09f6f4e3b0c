use serde::Serialize;

use super::domain::SpotType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeOccupancy {
    pub spot_type: SpotType,
    pub spot_type_label: String,
    pub total: usize,
    pub free: usize,
    pub occupied: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelOccupancy {
    pub level: String,
    pub by_type: Vec<TypeOccupancy>,
}

impl LevelOccupancy {
    pub fn total(&self) -> usize {
        self.by_type.iter().map(|entry| entry.total).sum()
    }

    pub fn free(&self) -> usize {
        self.by_type.iter().map(|entry| entry.free).sum()
    }

    pub fn occupied(&self) -> usize {
        self.by_type.iter().map(|entry| entry.occupied).sum()
    }
}

/// Point-in-time capacity view of the whole lot, levels in configured order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancyReport {
    pub levels: Vec<LevelOccupancy>,
    pub parked_vehicles: usize,
}

impl OccupancyReport {
    pub fn total(&self) -> usize {
        self.levels.iter().map(LevelOccupancy::total).sum()
    }

    pub fn free(&self) -> usize {
        self.levels.iter().map(LevelOccupancy::free).sum()
    }

    /// Free spots of one type summed across levels.
    pub fn free_of(&self, spot_type: SpotType) -> usize {
        self.levels
            .iter()
            .flat_map(|level| level.by_type.iter())
            .filter(|entry| entry.spot_type == spot_type)
            .map(|entry| entry.free)
            .sum()
    }

    pub fn level(&self, id: &str) -> Option<&LevelOccupancy> {
        self.levels.iter().find(|level| level.level == id)
    }
}
