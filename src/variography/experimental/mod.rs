use serde::{Deserialize, Serialize};

use crate::geometry::variogram_tolerance::DirectionSpec;

pub mod cpu_calculator;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LagBounds {
    pub lb: f64,
    pub ub: f64,
}

impl LagBounds {
    pub fn new(lb: f64, ub: f64) -> Self {
        Self { lb, ub }
    }

    pub fn mid_point(&self) -> f64 {
        (self.lb + self.ub) / 2f64
    }

    /// Open interval test, pairs exactly on a bound belong to neither lag.
    #[inline(always)]
    pub fn contains(&self, distance: f64) -> bool {
        self.lb < distance && distance < self.ub
    }
}

/// Experimental semivariogram of one direction.
///
/// Only lags that received at least one pair are stored, in increasing lag order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentalVariogram {
    pub direction: DirectionSpec,
    pub lags: Vec<LagBounds>,
    pub semivariance: Vec<f64>,
    pub counts: Vec<u64>,
}

impl ExperimentalVariogram {
    pub fn lag_centers(&self) -> Vec<f64> {
        self.lags.iter().map(|l| l.mid_point()).collect()
    }

    pub fn len(&self) -> usize {
        self.lags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }

    pub fn total_pairs(&self) -> u64 {
        self.counts.iter().sum()
    }
}

pub trait ExperimentalVariogramCalculator {
    fn calculate_for_directions(&self, directions: &[DirectionSpec])
        -> Vec<ExperimentalVariogram>;
}
