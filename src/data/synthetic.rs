//! Random-walk series used when a dataset file is not on disk

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::constants::synthetic::{CHANNELS, INTERVAL_MINUTES, ROWS, START_DATE};
use crate::data::series::{Matrix, TimeSeries};
use crate::data::source::generate_timestamps;
use crate::error::{PlotError, Result};

/// Hourly random walk of `ROWS x CHANNELS` starting at `START_DATE`
pub fn fallback_series() -> Result<TimeSeries> {
    random_walk(&mut rand::rng(), ROWS, CHANNELS)
}

/// Cumulative sum of standard normal steps per channel
pub fn random_walk<R: Rng + ?Sized>(rng: &mut R, rows: usize, channels: usize) -> Result<TimeSeries> {
    let start = start_timestamp()?;
    let timestamps = generate_timestamps(start, INTERVAL_MINUTES, rows)?;

    let mut level = vec![0.0; channels];
    let mut matrix = Matrix::with_columns(channels);
    for _ in 0..rows {
        for value in level.iter_mut() {
            let step: f64 = StandardNormal.sample(rng);
            *value += step;
        }
        matrix.push_row(&level)?;
    }

    let names = (0..channels).map(|i| format!("Channel {}", i)).collect();
    TimeSeries::new(timestamps, matrix, names)
}

fn start_timestamp() -> Result<NaiveDateTime> {
    NaiveDate::parse_from_str(START_DATE, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| PlotError::TypeConversion(format!("bad start date {}", START_DATE)))
}
