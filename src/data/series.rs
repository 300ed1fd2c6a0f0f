//! In-memory time series: timestamps paired with a row-major value matrix

use chrono::NaiveDateTime;

use crate::error::{PlotError, Result};

/// Dense row-major matrix of channel values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Matrix {
    /// Create an empty matrix with `cols` columns
    pub fn with_columns(cols: usize) -> Self {
        Self {
            rows: 0,
            cols,
            values: Vec::new(),
        }
    }

    /// Build from a list of rows; every row must have the same width
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut matrix = Self::with_columns(cols);
        matrix.values.reserve(rows.len() * cols);
        for row in rows {
            matrix.push_row(&row)?;
        }
        Ok(matrix)
    }

    /// Build from column vectors of equal length
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self> {
        let rows = columns.first().map(Vec::len).unwrap_or(0);
        if let Some((idx, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != rows) {
            return Err(PlotError::RaggedRow {
                row: idx,
                expected: rows,
                actual: col.len(),
            });
        }

        let cols = columns.len();
        let mut values = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            values.extend(columns.iter().map(|c| c[r]));
        }
        Ok(Self { rows, cols, values })
    }

    /// Append one row
    pub fn push_row(&mut self, row: &[f64]) -> Result<()> {
        if row.len() != self.cols {
            return Err(PlotError::RaggedRow {
                row: self.rows,
                expected: self.cols,
                actual: row.len(),
            });
        }
        self.values.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row at position `idx`
    pub fn row(&self, idx: usize) -> Option<&[f64]> {
        (idx < self.rows).then(|| &self.values[idx * self.cols..(idx + 1) * self.cols])
    }

    /// Copy of the column at position `col`
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        if col >= self.cols {
            return None;
        }
        Some(
            self.values
                .chunks_exact(self.cols)
                .map(|row| row[col])
                .collect(),
        )
    }

    /// Every `stride`-th row, starting at row 0
    pub fn stride_rows(&self, stride: usize) -> Self {
        let stride = stride.max(1);
        if self.cols == 0 {
            return Self {
                rows: self.rows.div_ceil(stride),
                cols: 0,
                values: Vec::new(),
            };
        }
        let values: Vec<f64> = self
            .values
            .chunks_exact(self.cols)
            .step_by(stride)
            .flatten()
            .copied()
            .collect();
        Self {
            rows: values.len() / self.cols,
            cols: self.cols,
            values,
        }
    }
}

/// A named column of the matrix. The index is positional, never a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub index: usize,
}

/// Timestamps plus an `N x C` matrix and the names of its `C` channels
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<NaiveDateTime>,
    matrix: Matrix,
    channel_names: Vec<String>,
}

impl TimeSeries {
    /// Validate shapes and build the series
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        matrix: Matrix,
        channel_names: Vec<String>,
    ) -> Result<Self> {
        if timestamps.len() != matrix.rows() {
            return Err(PlotError::ShapeMismatch {
                timestamps: timestamps.len(),
                rows: matrix.rows(),
            });
        }
        if channel_names.len() != matrix.cols() {
            return Err(PlotError::ChannelCountMismatch {
                names: channel_names.len(),
                columns: matrix.cols(),
            });
        }
        if timestamps.windows(2).any(|w| w[0] >= w[1]) {
            tracing::warn!("Timestamps are not strictly increasing");
        }
        Ok(Self {
            timestamps,
            matrix,
            channel_names,
        })
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    /// Number of rows (`N`)
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Channels for the given column indices, in column order, without duplicates.
    /// Indices past the last column are ignored.
    pub fn select_channels(&self, indices: &[usize]) -> Vec<Channel> {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.channel_names.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();
        sorted
            .into_iter()
            .map(|index| Channel {
                name: self.channel_names[index].clone(),
                index,
            })
            .collect()
    }

    /// First two channels, or the only one
    pub fn default_selection(&self) -> Vec<usize> {
        (0..self.channel_names.len().min(2)).collect()
    }
}
