//! Core data structures for GPCP 1DD processing.
//!
//! Defines header metadata, the decoded daily grid, the monthly mean,
//! per-file outcomes and batch statistics.

use crate::constants::{CELLS_PER_DAY, MAX_DAYS, NUM_LAT, NUM_LON};
use crate::error::{GpcpError, Result};
use crate::header::Header;
use ndarray::{Array2, Array3, ArrayView2, Axis};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// `key=value` fields parsed from a file header
///
/// Keys are unique; when a header repeats a key, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any earlier value for the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Number of daily records in a monthly file, always within `1..=31`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayCount(u8);

impl DayCount {
    /// Returns `None` outside `1..=31`
    pub fn new(days: u8) -> Option<Self> {
        (1..=MAX_DAYS).contains(&days).then_some(Self(days))
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }

    /// Number of float values a payload must supply for this many days
    pub fn value_count(self) -> usize {
        self.get() * CELLS_PER_DAY
    }
}

/// Daily precipitation grid with shape `(days, 180, 360)`
///
/// Axes are day, latitude, longitude in C order, so longitude varies fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Array3<f32>,
}

impl Grid {
    /// Shape a flat buffer holding exactly `days * 180 * 360` values
    pub fn from_values(days: usize, values: Vec<f32>) -> Result<Self> {
        let len = values.len();
        let data = Array3::from_shape_vec((days, NUM_LAT, NUM_LON), values).map_err(|e| {
            GpcpError::invalid_state(format!(
                "grid buffer of {} values does not fit shape ({}, {}, {}): {}",
                len, days, NUM_LAT, NUM_LON, e
            ))
        })?;
        Ok(Self { data })
    }

    pub fn days(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn array(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn into_array(self) -> Array3<f32> {
        self.data
    }

    /// The `(180, 360)` view for one day
    pub fn day(&self, day: usize) -> Option<ArrayView2<'_, f32>> {
        (day < self.days()).then(|| self.data.index_axis(Axis(0), day))
    }

    pub fn get(&self, day: usize, lat: usize, lon: usize) -> Option<f32> {
        self.data.get((day, lat, lon)).copied()
    }
}

/// Monthly mean grid with shape `(180, 360)`
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyMean {
    data: Array2<f32>,
}

impl MonthlyMean {
    pub(crate) fn from_array(data: Array2<f32>) -> Self {
        debug_assert_eq!(data.dim(), (NUM_LAT, NUM_LON));
        Self { data }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn array(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn into_array(self) -> Array2<f32> {
        self.data
    }

    pub fn get(&self, lat: usize, lon: usize) -> Option<f32> {
        self.data.get((lat, lon)).copied()
    }
}

/// Everything decoded from one input file
#[derive(Debug, Clone)]
pub struct DecodedFile {
    pub path: PathBuf,
    pub header: Header,
    pub metadata: Metadata,
    pub grid: Grid,
}

/// Result of processing one file in a batch run
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub source: PathBuf,
    /// Name of the monthly mean array written to the output directory
    pub output_file: String,
    pub metadata: Metadata,
    pub days: usize,
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub output_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_count_bounds() {
        assert!(DayCount::new(0).is_none());
        assert!(DayCount::new(32).is_none());
        assert_eq!(DayCount::new(1).unwrap().get(), 1);
        assert_eq!(DayCount::new(31).unwrap().value_count(), 31 * 64_800);
    }

    #[test]
    fn test_metadata_last_insert_wins() {
        let mut metadata = Metadata::new();
        metadata.insert("unit", "mm/day");
        metadata.insert("unit", "mm/d");
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.get("unit"), Some("mm/d"));
    }

    #[test]
    fn test_grid_rejects_wrong_length() {
        let result = Grid::from_values(2, vec![0.0; CELLS_PER_DAY]);
        assert!(matches!(result, Err(GpcpError::InvalidState { .. })));
    }

    #[test]
    fn test_grid_indexing_is_longitude_fastest() {
        let values: Vec<f32> = (0..2 * CELLS_PER_DAY).map(|i| i as f32).collect();
        let grid = Grid::from_values(2, values).unwrap();

        assert_eq!(grid.shape(), (2, 180, 360));
        assert_eq!(grid.get(0, 0, 1), Some(1.0));
        assert_eq!(grid.get(0, 1, 0), Some(360.0));
        assert_eq!(grid.get(1, 0, 0), Some(CELLS_PER_DAY as f32));
        assert_eq!(grid.get(2, 0, 0), None);
        assert_eq!(grid.get(0, 180, 0), None);
        assert_eq!(grid.day(1).unwrap().dim(), (NUM_LAT, NUM_LON));
        assert_eq!(grid.day(1).unwrap()[[0, 2]], (CELLS_PER_DAY + 2) as f32);
        assert!(grid.day(2).is_none());
    }

    #[test]
    fn test_zero_day_grid_is_empty() {
        let grid = Grid::from_values(0, Vec::new()).unwrap();
        assert_eq!(grid.days(), 0);
        assert!(grid.is_empty());
    }
}
