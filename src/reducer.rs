//! Monthly reduction of daily grids.

use crate::error::{GpcpError, Result};
use crate::models::{Grid, MonthlyMean};
use ndarray::Axis;

/// Per-cell arithmetic mean over the day axis
///
/// Sums are accumulated in `f32` and divided by the number of days.
/// Missing-value sentinels are averaged like any other value.
pub fn monthly_mean(grid: &Grid) -> Result<MonthlyMean> {
    let days = grid.days();
    if days == 0 {
        return Err(GpcpError::invalid_state(
            "cannot average a grid with zero days",
        ));
    }

    let mean = grid.array().sum_axis(Axis(0)) / days as f32;
    Ok(MonthlyMean::from_array(mean))
}
