//! NumPy `.npz` archives holding sensor readings
//!
//! The archive must contain a `data` array shaped `(T, N)` or `(T, N, F)`.
//! For three dimensions only the first feature is kept. Columns are named
//! `Sensor 0`, `Sensor 1`, ... and timestamps are always generated.

use ndarray::{ArrayD, ArrayView2, Axis, Ix2};
use ndarray_npy::NpzReader;
use std::fs::File;
use std::path::Path;

use crate::data::series::{Matrix, TimeSeries};
use crate::data::source::{TimestampSource, generate_timestamps};
use crate::error::{PlotError, Result};

/// Array read from the archive
pub const DATA_ARRAY: &str = "data";

/// Load the `data` array of an archive into a [`TimeSeries`]
pub fn load_npz(path: &Path, timestamps: &TimestampSource) -> Result<TimeSeries> {
    profiling::scope!("load_npz");

    let TimestampSource::Generated {
        start,
        interval_minutes,
    } = timestamps
    else {
        return Err(PlotError::TypeConversion(
            "npz archives have no time column, use generated timestamps".into(),
        ));
    };

    let data = read_data_array(path)?;
    let values = first_feature(&data)?;
    let (rows, sensors) = values.dim();
    if rows == 0 {
        return Err(PlotError::EmptyDataset);
    }

    let matrix = Matrix::from_rows(values.rows().into_iter().map(|r| r.to_vec()).collect())?;
    let names = (0..sensors).map(|i| format!("Sensor {}", i)).collect();
    let times = generate_timestamps(*start, *interval_minutes, rows)?;
    TimeSeries::new(times, matrix, names)
}

/// Read `data` as f64, widening f32 archives
fn read_data_array(path: &Path) -> Result<ArrayD<f64>> {
    let mut npz = NpzReader::new(File::open(path)?)?;
    let name = npz
        .names()?
        .into_iter()
        .find(|n| n.strip_suffix(".npy").unwrap_or(n) == DATA_ARRAY)
        .ok_or_else(|| PlotError::MissingArray {
            name: DATA_ARRAY.to_string(),
        })?;

    let as_f64: std::result::Result<ArrayD<f64>, _> = npz.by_name(&name);
    match as_f64 {
        Ok(data) => Ok(data),
        Err(e) => {
            tracing::debug!("'{}' is not f64 ({}), trying f32", name, e);
            let data: ArrayD<f32> = npz.by_name(&name)?;
            Ok(data.mapv(f64::from))
        }
    }
}

/// `(T, N)` view of the array; `[:, :, 0]` for three dimensions
fn first_feature(data: &ArrayD<f64>) -> Result<ArrayView2<'_, f64>> {
    let view = match data.shape() {
        [_, _] => data.view(),
        [_, _, features] if *features > 0 => data.index_axis(Axis(2), 0),
        shape => {
            return Err(PlotError::TypeConversion(format!(
                "'{}' array has shape {:?}, expected (T, N) or (T, N, F)",
                DATA_ARRAY, shape
            )));
        }
    };
    view.into_dimensionality::<Ix2>()
        .map_err(|e| PlotError::TypeConversion(e.to_string()))
}
