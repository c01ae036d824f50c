//! Experimental semivariograms of irregularly spaced 2-D samples, optionally with a fitted
//! theoretical model.
//!
//! ```text
//! γ(h) = 1 / (2 N(h)) · Σ (v_p − v_o)²   over the N(h) pairs whose separation falls in lag h
//! ```
//!
//! The pair geometry is computed once, every requested direction is binned from it, and the
//! selected model(s) are fitted per direction by least squares. Which model wins a
//! best-guess run is decided by the smallest mean coefficient of variation of the fitted
//! parameters, which says nothing about whether that model suits the data.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SemivariogramError};
use crate::geometry::pairwise::PairwiseGeometry;
use crate::geometry::variogram_tolerance::{DirectionSpec, VariogramKind};
use crate::spatial_database::PointSet;
use crate::variography::experimental::cpu_calculator::CPUCalculator;
use crate::variography::experimental::{ExperimentalVariogram, ExperimentalVariogramCalculator};
use crate::variography::model_variograms::fit::{InitialGuess, ModelFit};
use crate::variography::model_variograms::ModelSelection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemivariogramParams {
    /// Number of equal width lags between 0 and the largest pair distance.
    pub n_lags: usize,
    /// Directions in degrees, counter clockwise from east, each within [-180, 180].
    pub directions: Vec<f64>,
    /// One sided angular tolerance in degrees; 30 spans 60 degrees.
    pub tolerance: f64,
    pub kind: VariogramKind,
    pub model: ModelSelection,
    pub initial_guess: InitialGuess,
}

impl Default for SemivariogramParams {
    fn default() -> Self {
        Self {
            n_lags: 50,
            directions: vec![0.0],
            tolerance: 180.0,
            kind: VariogramKind::Omnidirectional,
            model: ModelSelection::Exponential,
            initial_guess: InitialGuess::default(),
        }
    }
}

impl SemivariogramParams {
    pub fn new(
        n_lags: usize,
        directions: Vec<f64>,
        tolerance: f64,
        kind: VariogramKind,
        model: ModelSelection,
    ) -> Self {
        Self {
            n_lags,
            directions,
            tolerance,
            kind,
            model,
            initial_guess: InitialGuess::default(),
        }
    }

    pub fn with_initial_guess(mut self, initial_guess: InitialGuess) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_lags == 0 {
            return Err(SemivariogramError::InvalidLagCount);
        }

        for direction in self.directions.iter().copied() {
            if !(-180.0..=180.0).contains(&direction) {
                return Err(SemivariogramError::InvalidDirection(direction));
            }
            // folding makes negative directions duplicates of positive ones
            if self.kind == VariogramKind::Directional && direction < 0.0 {
                return Err(SemivariogramError::NegativeDirection(direction));
            }
        }

        if !(0.0..=180.0).contains(&self.tolerance) {
            return Err(SemivariogramError::InvalidTolerance(self.tolerance));
        }

        Ok(())
    }

    /// Directions actually binned; omnidirectional runs always use a single full circle.
    pub fn direction_specs(&self) -> Vec<DirectionSpec> {
        match self.kind {
            VariogramKind::Omnidirectional => vec![DirectionSpec::omnidirectional()],
            kind => self
                .directions
                .iter()
                .map(|d| DirectionSpec::new(*d, self.tolerance, kind))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemivariogramResult {
    pub kind: VariogramKind,
    /// One experimental semivariogram per binned direction.
    pub variograms: Vec<ExperimentalVariogram>,
    /// `None` when model fitting was disabled.
    pub fit: Option<ModelFit>,
}

impl SemivariogramResult {
    pub fn directions(&self) -> Vec<DirectionSpec> {
        self.variograms.iter().map(|v| v.direction).collect()
    }

    pub fn lags(&self) -> Vec<Vec<f64>> {
        self.variograms.iter().map(|v| v.lag_centers()).collect()
    }

    pub fn semivariances(&self) -> Vec<Vec<f64>> {
        self.variograms
            .iter()
            .map(|v| v.semivariance.clone())
            .collect()
    }

    pub fn counts(&self) -> Vec<Vec<u64>> {
        self.variograms.iter().map(|v| v.counts.clone()).collect()
    }
}

/// Computes the experimental semivariogram(s) of `point_set` and fits the requested model.
pub fn semivariogram(
    point_set: &PointSet,
    params: &SemivariogramParams,
) -> Result<SemivariogramResult> {
    if point_set.points.len() != point_set.data.len() {
        return Err(SemivariogramError::InputShape {
            x: point_set.points.len(),
            y: point_set.points.len(),
            v: point_set.data.len(),
        });
    }
    params.validate()?;
    if point_set.len() < 2 {
        return Err(SemivariogramError::DegenerateInput(point_set.len()));
    }

    let start = Instant::now();

    let geometry = PairwiseGeometry::new(&point_set.points);
    let calc = CPUCalculator::new(&geometry, &point_set.data, params.n_lags);
    let variograms = calc.calculate_for_directions(&params.direction_specs());

    debug!(
        pairs = geometry.len(),
        directions = variograms.len(),
        elapsed = ?start.elapsed(),
        "experimental semivariogram computed"
    );

    let fit = fit_models(&variograms, params.model, params.initial_guess);

    Ok(SemivariogramResult {
        kind: params.kind,
        variograms,
        fit,
    })
}

/// Same as [`semivariogram`] for separate easting, northing and value columns.
pub fn semivariogram_from_columns(
    x: &[f64],
    y: &[f64],
    v: &[f64],
    params: &SemivariogramParams,
) -> Result<SemivariogramResult> {
    let point_set = PointSet::from_columns(x, y, v)?;
    semivariogram(&point_set, params)
}

#[cfg(feature = "fitting")]
fn fit_models(
    variograms: &[ExperimentalVariogram],
    model: ModelSelection,
    guess: InitialGuess,
) -> Option<ModelFit> {
    use rayon::prelude::*;
    use tracing::{info, warn};

    use crate::variography::model_variograms::fit::FitOutcome;
    use crate::variography::model_variograms::iso_fitter::fit_model;

    let candidates = model.candidates();
    if candidates.is_empty() {
        return None;
    }

    let start = Instant::now();

    let fits = candidates
        .into_iter()
        .map(|kind| {
            let outcomes = variograms
                .par_iter()
                .map(|vgram| fit_model(vgram, kind, guess))
                .collect::<Vec<_>>();

            for (vgram, outcome) in variograms.iter().zip(outcomes.iter()) {
                if let FitOutcome::Failed(err) = outcome {
                    warn!(
                        model = %kind.title(),
                        direction = vgram.direction.direction,
                        error = %err,
                        "model can not be fitted to direction"
                    );
                }
            }

            (kind, outcomes)
        })
        .collect::<Vec<_>>();

    let selected = ModelFit::select(fits)?;

    debug!(elapsed = ?start.elapsed(), "theoretical semivariogram fitted");
    info!(
        model = %selected.model.title(),
        nuggets = ?selected.nuggets(),
        sills = ?selected.sills(),
        ranges = ?selected.ranges(),
        scores = ?selected.scores(),
        "semivariogram model selected"
    );

    Some(selected)
}

#[cfg(not(feature = "fitting"))]
fn fit_models(
    _variograms: &[ExperimentalVariogram],
    model: ModelSelection,
    _guess: InitialGuess,
) -> Option<ModelFit> {
    if model != ModelSelection::None {
        tracing::warn!(
            %model,
            "built without the `fitting` feature, no model is fitted to the experimental semivariogram"
        );
    }
    None
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::spatial_database::test_data::sample_point_set;

    use super::*;

    #[test]
    fn omnidirectional_without_model() {
        let params = SemivariogramParams::new(
            50,
            vec![0.0],
            180.0,
            VariogramKind::Omnidirectional,
            ModelSelection::None,
        );
        let result = semivariogram(&sample_point_set(), &params).unwrap();

        assert!(result.fit.is_none());
        assert_eq!(result.variograms.len(), 1);

        let expected = [
            0.550, 0.776, 0.619, 0.849, 0.991, 1.033, 1.067, 1.106, 1.079, 1.002,
        ];
        let semivariances = result.semivariances();
        for (value, expected) in semivariances[0].iter().zip(expected) {
            assert_abs_diff_eq!(*value, expected, epsilon = 1e-3);
        }
        assert_eq!(result.lags()[0].len(), result.counts()[0].len());
    }

    #[test]
    fn omnidirectional_ignores_requested_directions() {
        let params = SemivariogramParams::new(
            20,
            vec![10.0, 120.0, 170.0],
            15.0,
            VariogramKind::Omnidirectional,
            ModelSelection::None,
        );
        let result = semivariogram(&sample_point_set(), &params).unwrap();

        assert_eq!(result.directions(), vec![DirectionSpec::omnidirectional()]);
    }

    #[test]
    fn full_tolerance_reproduces_omnidirectional() {
        let point_set = sample_point_set();
        let omni = semivariogram(
            &point_set,
            &SemivariogramParams::new(
                30,
                vec![0.0],
                180.0,
                VariogramKind::Omnidirectional,
                ModelSelection::None,
            ),
        )
        .unwrap();

        let oriented = semivariogram(
            &point_set,
            &SemivariogramParams::new(
                30,
                vec![-90.0, 45.0],
                180.0,
                VariogramKind::DirectionalOrientational,
                ModelSelection::None,
            ),
        )
        .unwrap();

        for vgram in oriented.variograms.iter() {
            assert_eq!(vgram.counts, omni.variograms[0].counts);
            assert_eq!(vgram.semivariance, omni.variograms[0].semivariance);
        }
    }

    #[test]
    fn validation_errors() {
        let point_set = sample_point_set();
        let base = SemivariogramParams::default();

        let params = SemivariogramParams {
            n_lags: 0,
            ..base.clone()
        };
        assert_eq!(
            semivariogram(&point_set, &params),
            Err(SemivariogramError::InvalidLagCount)
        );

        let params = SemivariogramParams {
            directions: vec![0.0, 190.0],
            ..base.clone()
        };
        assert_eq!(
            semivariogram(&point_set, &params),
            Err(SemivariogramError::InvalidDirection(190.0))
        );

        let params = SemivariogramParams {
            directions: vec![f64::NAN],
            ..base.clone()
        };
        assert!(matches!(
            semivariogram(&point_set, &params),
            Err(SemivariogramError::InvalidDirection(_))
        ));

        let params = SemivariogramParams {
            directions: vec![45.0, -45.0],
            kind: VariogramKind::Directional,
            ..base.clone()
        };
        assert_eq!(
            semivariogram(&point_set, &params),
            Err(SemivariogramError::NegativeDirection(-45.0))
        );

        // negative directions are fine when orientation matters
        let params = SemivariogramParams {
            directions: vec![45.0, -45.0],
            tolerance: 30.0,
            kind: VariogramKind::DirectionalOrientational,
            model: ModelSelection::None,
            ..base.clone()
        };
        assert!(semivariogram(&point_set, &params).is_ok());

        let params = SemivariogramParams {
            tolerance: 181.0,
            ..base.clone()
        };
        assert_eq!(
            semivariogram(&point_set, &params),
            Err(SemivariogramError::InvalidTolerance(181.0))
        );

        let params = SemivariogramParams {
            tolerance: -1.0,
            ..base
        };
        assert_eq!(
            semivariogram(&point_set, &params),
            Err(SemivariogramError::InvalidTolerance(-1.0))
        );
    }

    #[test]
    fn shape_and_degenerate_input() {
        let params = SemivariogramParams::default();

        assert_eq!(
            semivariogram_from_columns(&[0.0, 1.0], &[0.0, 1.0], &[1.0], &params),
            Err(SemivariogramError::InputShape { x: 2, y: 2, v: 1 })
        );
        assert_eq!(
            semivariogram_from_columns(&[0.0], &[0.0], &[1.0], &params),
            Err(SemivariogramError::DegenerateInput(1))
        );
        assert_eq!(
            semivariogram_from_columns(&[], &[], &[], &params),
            Err(SemivariogramError::DegenerateInput(0))
        );
    }

    #[test]
    fn params_from_keywords() {
        let params = SemivariogramParams::new(
            10,
            vec![0.0, 90.0],
            45.0,
            "directional".parse().unwrap(),
            "best-guess".parse().unwrap(),
        )
        .with_initial_guess(InitialGuess::new(0.4, 0.6, 90.0));

        assert_eq!(params.kind, VariogramKind::Directional);
        assert_eq!(params.model, ModelSelection::BestGuess);
        assert_eq!(params.initial_guess.range, 90.0);
        assert_eq!(params.direction_specs().len(), 2);
        assert!(params.validate().is_ok());
    }

    #[cfg(feature = "fitting")]
    mod fitting {
        use approx::assert_abs_diff_eq;

        use crate::spatial_database::test_data::sample_point_set;
        use crate::variography::model_variograms::ModelKind;

        use super::super::*;

        #[test]
        fn omnidirectional_exponential() {
            let params = SemivariogramParams::new(
                50,
                vec![0.0],
                180.0,
                VariogramKind::Omnidirectional,
                ModelSelection::Exponential,
            );
            let result = semivariogram(&sample_point_set(), &params).unwrap();
            let fit = result.fit.unwrap();

            assert_eq!(fit.model, ModelKind::Exponential);
            assert_eq!(fit.outcomes.len(), 1);
            assert_abs_diff_eq!(fit.nuggets()[0], 0.425, epsilon = 2e-3);
            assert_abs_diff_eq!(fit.sills()[0], 1.056, epsilon = 2e-3);
            assert_abs_diff_eq!(fit.ranges()[0], 93.0, epsilon = 1.0);
            assert!(fit.scores()[0].is_finite());
        }

        #[test]
        fn directional_spherical() {
            let params = SemivariogramParams::new(
                50,
                vec![0.0, 90.0],
                45.0,
                VariogramKind::Directional,
                ModelSelection::Spherical,
            );
            let result = semivariogram(&sample_point_set(), &params).unwrap();
            let fit = result.fit.unwrap();

            assert_eq!(fit.model, ModelKind::Spherical);
            for (value, expected) in fit.nuggets().iter().zip([0.487, 0.554]) {
                assert_abs_diff_eq!(*value, expected, epsilon = 2e-3);
            }
            for (value, expected) in fit.sills().iter().zip([1.071, 1.034]) {
                assert_abs_diff_eq!(*value, expected, epsilon = 2e-3);
            }
            for (value, expected) in fit.ranges().iter().zip([94.0, 112.0]) {
                assert_abs_diff_eq!(*value, expected, epsilon = 1.0);
            }
        }

        #[test]
        fn oriented_spherical_eight_directions() {
            let params = SemivariogramParams::new(
                50,
                vec![0.0, 45.0, 90.0, 135.0, 180.0, -45.0, -90.0, -135.0],
                30.0,
                VariogramKind::DirectionalOrientational,
                ModelSelection::Spherical,
            );
            let result = semivariogram(&sample_point_set(), &params).unwrap();
            let fit = result.fit.unwrap();

            assert_eq!(result.variograms.len(), 8);
            assert_eq!(fit.covariances().len(), 8);
            assert_eq!(
                result.variograms.iter().map(|v| v.total_pairs()).collect::<Vec<_>>(),
                vec![644, 579, 570, 775, 1057, 627, 820, 892]
            );

            let (nuggets, sills, ranges) = (fit.nuggets(), fit.sills(), fit.ranges());

            // 180 keeps the due west pairs, hence its own values
            let expected = [
                (0, 0.041, 1.075, 74.0),
                (1, 0.393, 1.193, 122.0),
                (2, 0.529, 1.171, 132.0),
                (3, 0.538, 1.187, 130.0),
                (4, -0.383, 1.040, 72.0),
                (5, 0.651, 1.130, 171.0),
                (6, 0.504, 1.103, 310.0),
            ];
            for (i, nugget, sill, range) in expected {
                assert_abs_diff_eq!(nuggets[i], nugget, epsilon = 2e-3);
                assert_abs_diff_eq!(sills[i], sill, epsilon = 2e-3);
                assert_abs_diff_eq!(ranges[i], range, epsilon = 1.0);
            }

            // only the first lag lies inside the range at -135, so the sill is the only
            // well determined parameter and the range lands between the first two lags
            assert_abs_diff_eq!(sills[7], 1.086, epsilon = 2e-3);
            let lags = result.variograms[7].lag_centers();
            assert!(ranges[7] > lags[0] && ranges[7] < lags[1] + 1.0);
        }

        #[test]
        fn best_guess_picks_lowest_mean_score() {
            let params = SemivariogramParams::new(
                50,
                vec![0.0],
                180.0,
                VariogramKind::Omnidirectional,
                ModelSelection::BestGuess,
            );
            let result = semivariogram(&sample_point_set(), &params).unwrap();
            let fit = result.fit.unwrap();

            assert_eq!(fit.candidate_scores.len(), 3);
            let best = fit
                .candidate_scores
                .iter()
                .map(|(_, score)| *score)
                .fold(f64::INFINITY, f64::min);
            let chosen = fit
                .candidate_scores
                .iter()
                .find(|(kind, _)| *kind == fit.model)
                .unwrap();
            assert_eq!(chosen.1, best);
            assert_abs_diff_eq!(fit.scores()[0], best, epsilon = 1e-12);
        }

        #[test]
        fn failed_fits_do_not_abort_the_run() {
            // three points on a line fill a single lag, too few for three parameters
            let params = SemivariogramParams::new(
                3,
                vec![0.0],
                180.0,
                VariogramKind::Omnidirectional,
                ModelSelection::BestGuess,
            );
            let result = semivariogram_from_columns(
                &[0.0, 1.2, 3.0],
                &[0.0, 0.0, 0.0],
                &[1.0, 2.0, 4.0],
                &params,
            )
            .unwrap();
            let fit = result.fit.unwrap();

            assert_eq!(result.variograms.len(), 1);
            assert!(fit.candidate_scores.iter().all(|(_, s)| s.is_infinite()));
            assert_eq!(fit.model, ModelKind::Exponential);
            assert!(fit.nuggets()[0].is_nan());
        }
    }
}
