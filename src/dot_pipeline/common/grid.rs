//! Output dot grid types

use serde::{Deserialize, Serialize};

/// A single grid cell value: a scalar intensity or an RGB triple, each in [0, 1].
pub trait DotValue: Copy + PartialEq {
    fn zero() -> Self;
    fn add(self, other: Self) -> Self;
    /// Applies `f` to every channel.
    fn map(self, f: impl Fn(f64) -> f64) -> Self;
}

impl DotValue for f64 {
    fn zero() -> Self {
        0.0
    }

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        f(self)
    }
}

impl DotValue for [f64; 3] {
    fn zero() -> Self {
        [0.0; 3]
    }

    fn add(self, other: Self) -> Self {
        [self[0] + other[0], self[1] + other[1], self[2] + other[2]]
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        [f(self[0]), f(self[1]), f(self[2])]
    }
}

/// Row-major cell storage. Serializes as a flat array of scalars or of `[r, g, b]` triples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DotCells {
    Scalar(Vec<f64>),
    Rgb(Vec<[f64; 3]>),
}

impl DotCells {
    pub fn len(&self) -> usize {
        match self {
            DotCells::Scalar(values) => values.len(),
            DotCells::Rgb(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One processed frame: `cols * rows` cells in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DotGrid {
    pub cols: usize,
    pub rows: usize,
    pub cells: DotCells,
}

impl DotGrid {
    pub fn scalar(cols: usize, rows: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), cols * rows);
        Self {
            cols,
            rows,
            cells: DotCells::Scalar(values),
        }
    }

    pub fn rgb(cols: usize, rows: usize, values: Vec<[f64; 3]>) -> Self {
        debug_assert_eq!(values.len(), cols * rows);
        Self {
            cols,
            rows,
            cells: DotCells::Rgb(values),
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self.cells, DotCells::Rgb(_))
    }

    pub fn scalars(&self) -> Option<&[f64]> {
        match &self.cells {
            DotCells::Scalar(values) => Some(values),
            DotCells::Rgb(_) => None,
        }
    }

    pub fn colors(&self) -> Option<&[[f64; 3]]> {
        match &self.cells {
            DotCells::Rgb(values) => Some(values),
            DotCells::Scalar(_) => None,
        }
    }
}
