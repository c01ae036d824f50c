use itertools::izip;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SemivariogramError};

/// A single measurement: easting/northing location and the observed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub coords: Point2<f64>,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self {
            coords: Point2::new(x, y),
            value,
        }
    }
}

/// Index aligned sample locations and values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSet {
    pub points: Vec<Point2<f64>>,
    pub data: Vec<f64>,
}

impl PointSet {
    pub fn new(points: Vec<Point2<f64>>, data: Vec<f64>) -> Result<Self> {
        if points.len() != data.len() {
            return Err(SemivariogramError::InputShape {
                x: points.len(),
                y: points.len(),
                v: data.len(),
            });
        }
        Ok(Self { points, data })
    }

    /// Builds a point set from separate easting, northing and value columns.
    pub fn from_columns(x: &[f64], y: &[f64], v: &[f64]) -> Result<Self> {
        if x.len() != y.len() || y.len() != v.len() {
            return Err(SemivariogramError::InputShape {
                x: x.len(),
                y: y.len(),
                v: v.len(),
            });
        }

        let points = x
            .iter()
            .zip(y.iter())
            .map(|(x, y)| Point2::new(*x, *y))
            .collect();

        Ok(Self {
            points,
            data: v.to_vec(),
        })
    }

    pub fn from_samples(samples: &[SamplePoint]) -> Self {
        let (points, data) = samples.iter().map(|s| (s.coords, s.value)).unzip();
        Self { points, data }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = SamplePoint> + '_ {
        izip!(self.points.iter(), self.data.iter()).map(|(p, v)| SamplePoint {
            coords: *p,
            value: *v,
        })
    }
}
