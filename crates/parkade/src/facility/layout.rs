use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::level::SpotCounts;

#[derive(Debug)]
pub enum LayoutError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateLevel(String),
    BlankLevelId,
    Empty,
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::Io(err) => write!(f, "failed to read layout: {}", err),
            LayoutError::Csv(err) => write!(f, "invalid layout CSV data: {}", err),
            LayoutError::DuplicateLevel(id) => write!(f, "level {} is declared twice", id),
            LayoutError::BlankLevelId => write!(f, "level ids must not be blank"),
            LayoutError::Empty => write!(f, "a lot needs at least one level"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Io(err) => Some(err),
            LayoutError::Csv(err) => Some(err),
            LayoutError::DuplicateLevel(_) | LayoutError::BlankLevelId | LayoutError::Empty => {
                None
            }
        }
    }
}

impl From<std::io::Error> for LayoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LayoutError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub id: String,
    pub counts: SpotCounts,
}

/// Ordered level definitions a lot is built from. Levels are tried for
/// parking in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotLayout {
    levels: Vec<LevelLayout>,
}

impl LotLayout {
    pub fn new(levels: Vec<LevelLayout>) -> Result<Self, LayoutError> {
        if levels.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut seen = HashSet::new();
        for level in &levels {
            if level.id.trim().is_empty() {
                return Err(LayoutError::BlankLevelId);
            }
            if !seen.insert(level.id.as_str()) {
                return Err(LayoutError::DuplicateLevel(level.id.clone()));
            }
        }

        Ok(Self { levels })
    }

    /// Same spot counts on every level.
    pub fn uniform<I, S>(ids: I, counts: SpotCounts) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels = ids
            .into_iter()
            .map(|id| LevelLayout {
                id: id.into(),
                counts,
            })
            .collect();
        Self::new(levels)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads `level,handicap,compact,large,motorcycle` rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LayoutError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut levels = Vec::new();
        for row in csv_reader.deserialize::<LayoutRow>() {
            let row = row?;
            levels.push(LevelLayout {
                id: row.level,
                counts: SpotCounts::new(row.handicap, row.compact, row.large, row.motorcycle),
            });
        }

        Self::new(levels)
    }

    pub fn levels(&self) -> &[LevelLayout] {
        &self.levels
    }

    pub fn capacity(&self) -> usize {
        self.levels.iter().map(|level| level.counts.total()).sum()
    }
}

#[derive(Debug, Deserialize)]
struct LayoutRow {
    level: String,
    #[serde(default)]
    handicap: usize,
    #[serde(default)]
    compact: usize,
    #[serde(default)]
    large: usize,
    #[serde(default)]
    motorcycle: usize,
}
