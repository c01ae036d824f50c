use crate::geometry::pairwise::PairwiseGeometry;
use crate::geometry::variogram_tolerance::DirectionSpec;

use super::{ExperimentalVariogram, ExperimentalVariogramCalculator, LagBounds};

use itertools::izip;
use rayon::prelude::*;

/// Bins the shared pair geometry into equal width lags, one pass per direction.
#[derive(Clone, Copy)]
pub struct CPUCalculator<'a> {
    geometry: &'a PairwiseGeometry,
    values: &'a [f64],
    n_lags: usize,
}

impl<'a> CPUCalculator<'a> {
    /// `values` must be index aligned with the points `geometry` was built from.
    pub fn new(geometry: &'a PairwiseGeometry, values: &'a [f64], n_lags: usize) -> Self {
        Self {
            geometry,
            values,
            n_lags,
        }
    }

    /// Lag width `max_distance / n_lags`, `None` when no positive width exists.
    pub fn lag_width(&self) -> Option<f64> {
        let width = self.geometry.max_distance()? / self.n_lags as f64;
        (width.is_finite() && width > 0.0).then_some(width)
    }

    pub fn lag_bounds(&self, lag: usize, lag_width: f64) -> LagBounds {
        LagBounds::new(lag as f64 * lag_width, (lag + 1) as f64 * lag_width)
    }

    /// Lag holding `distance` strictly inside its bounds.
    ///
    /// The floor of `distance / lag_width` is only a guess, the neighbouring lags are
    /// checked against the exact bounds so rounding never moves a pair.
    #[inline(always)]
    fn lag_index(&self, distance: f64, lag_width: f64) -> Option<usize> {
        let guess = (distance / lag_width).floor();
        if !(guess >= 0.0) {
            return None;
        }
        let guess = guess as usize;

        [guess.checked_sub(1), Some(guess), guess.checked_add(1)]
            .into_iter()
            .flatten()
            .filter(|lag| *lag < self.n_lags)
            .find(|lag| self.lag_bounds(*lag, lag_width).contains(distance))
    }

    pub fn calculate(&self, direction: &DirectionSpec) -> ExperimentalVariogram {
        let mut variogram = ExperimentalVariogram {
            direction: *direction,
            lags: Vec::new(),
            semivariance: Vec::new(),
            counts: Vec::new(),
        };

        let Some(lag_width) = self.lag_width() else {
            return variogram;
        };

        let mut sums = vec![0f64; self.n_lags];
        let mut counts = vec![0u64; self.n_lags];

        for pair in self.geometry.pairs() {
            let Some(lag) = self.lag_index(pair.distance, lag_width) else {
                continue;
            };

            if !direction.contains_angle(pair.angle) {
                continue;
            }

            sums[lag] += pair.squared_difference(self.values);
            counts[lag] += 1;
        }

        for (lag, sum, count) in izip!(0..self.n_lags, sums, counts) {
            if count == 0 {
                continue;
            }
            variogram.lags.push(self.lag_bounds(lag, lag_width));
            variogram.semivariance.push(sum / (2f64 * count as f64));
            variogram.counts.push(count);
        }

        variogram
    }
}

impl ExperimentalVariogramCalculator for CPUCalculator<'_> {
    fn calculate_for_directions(
        &self,
        directions: &[DirectionSpec],
    ) -> Vec<ExperimentalVariogram> {
        directions
            .par_iter()
            .map(|direction| self.calculate(direction))
            .collect()
    }
}
