use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::*;
use std::path::Path;

use crate::constants::datetime::{DATE_FORMATS, PARSE_FORMATS};
use crate::data::npz::load_npz;
use crate::data::series::{Matrix, TimeSeries};
use crate::error::{PlotError, Result};

/// Where the timestamps of a dataset come from
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimestampSource {
    /// First column holds the timestamps, the remaining columns are channels
    FirstColumn,
    /// No time column: timestamps are generated at a fixed interval and every
    /// column is a channel
    Generated {
        start: NaiveDateTime,
        interval_minutes: i64,
    },
}

/// Read a CSV or Parquet file into a DataFrame. NumPy archives go through
/// [`load_npz`] instead.
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PlotError::UnsupportedFormat {
            extension: String::new(),
        })?;

    let lf = match extension.to_lowercase().as_str() {
        "parquet" => LazyFrame::scan_parquet(path, Default::default())?,
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .with_try_parse_dates(true)
            .finish()?,
        ext => {
            return Err(PlotError::UnsupportedFormat {
                extension: ext.to_string(),
            });
        }
    };

    Ok(lf.collect()?)
}

/// Load a file into a [`TimeSeries`]
pub fn load_series(path: &Path, timestamps: &TimestampSource) -> Result<TimeSeries> {
    profiling::scope!("load_series");

    let is_npz = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("npz"));
    if is_npz {
        return load_npz(path, timestamps);
    }

    let df = read_frame(path)?;
    frame_to_series(&df, timestamps)
}

/// Split a DataFrame into timestamps, value matrix and channel names
pub fn frame_to_series(df: &DataFrame, timestamps: &TimestampSource) -> Result<TimeSeries> {
    if df.height() == 0 {
        return Err(PlotError::EmptyDataset);
    }

    let columns = df.get_columns();
    let (times, value_columns) = match timestamps {
        TimestampSource::FirstColumn => {
            let (first, rest) = columns.split_first().ok_or(PlotError::EmptyDataset)?;
            (column_as_datetime(first.as_materialized_series())?, rest)
        }
        TimestampSource::Generated {
            start,
            interval_minutes,
        } => (
            generate_timestamps(*start, *interval_minutes, df.height())?,
            columns,
        ),
    };

    let names: Vec<String> = value_columns.iter().map(|c| c.name().to_string()).collect();
    let values = value_columns
        .iter()
        .map(|c| column_as_f64(c.as_materialized_series()))
        .collect::<Result<Vec<_>>>()?;

    let matrix = if values.is_empty() {
        let mut m = Matrix::with_columns(0);
        for _ in 0..df.height() {
            m.push_row(&[])?;
        }
        m
    } else {
        Matrix::from_columns(&values)?
    };

    TimeSeries::new(times, matrix, names)
}

/// Evenly spaced timestamps. Fails when the last one falls outside the
/// representable date range.
pub fn generate_timestamps(
    start: NaiveDateTime,
    interval_minutes: i64,
    count: usize,
) -> Result<Vec<NaiveDateTime>> {
    let overflow = || {
        PlotError::TypeConversion(format!(
            "{} timestamps every {} minutes from {} overflow the date range",
            count, interval_minutes, start
        ))
    };

    (0..count)
        .map(|i| {
            i64::try_from(i)
                .ok()
                .and_then(|i| i.checked_mul(interval_minutes))
                .and_then(TimeDelta::try_minutes)
                .and_then(|offset| start.checked_add_signed(offset))
                .ok_or_else(overflow)
        })
        .collect()
}

/// Numeric values of a column; nulls and unparsable values become NaN
fn column_as_f64(series: &Series) -> Result<Vec<f64>> {
    match series.cast(&DataType::Float64) {
        Ok(s) => Ok(s
            .f64()?
            .into_iter()
            .map(|opt| opt.unwrap_or(f64::NAN))
            .collect()),
        Err(_) => {
            let str_series = series.str().map_err(|_| {
                PlotError::TypeConversion(format!(
                    "column '{}' ({}) is not numeric",
                    series.name(),
                    series.dtype()
                ))
            })?;
            Ok(str_series
                .into_iter()
                .map(|opt| opt.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN))
                .collect())
        }
    }
}

/// Timestamps of a Datetime, Date or string column
fn column_as_datetime(series: &Series) -> Result<Vec<NaiveDateTime>> {
    let name = series.name().to_string();
    let missing = |row: usize| {
        PlotError::TypeConversion(format!("column '{}' has no timestamp at row {}", name, row))
    };

    match series.dtype() {
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            series
                .datetime()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    v.and_then(|raw| datetime_from_raw(raw, unit))
                        .ok_or_else(|| missing(row))
                })
                .collect()
        }
        DataType::Date => series
            .date()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.and_then(|days| {
                    NaiveDate::from_ymd_opt(1970, 1, 1)?
                        .checked_add_signed(chrono::Duration::days(days as i64))?
                        .and_hms_opt(0, 0, 0)
                })
                .ok_or_else(|| missing(row))
            })
            .collect(),
        DataType::String => series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| v.and_then(parse_timestamp).ok_or_else(|| missing(row)))
            .collect(),
        other => Err(PlotError::TypeConversion(format!(
            "column '{}' of type {} cannot hold timestamps",
            name, other
        ))),
    }
}

fn datetime_from_raw(raw: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Nanoseconds => chrono::DateTime::from_timestamp_nanos(raw),
        TimeUnit::Microseconds => chrono::DateTime::from_timestamp_micros(raw)?,
        TimeUnit::Milliseconds => chrono::DateTime::from_timestamp_millis(raw)?,
    };
    Some(dt.naive_utc())
}

/// Parse a textual timestamp in one of the supported formats
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    PARSE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
