use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{IsoVariogramModel, IsoVariogramType, ModelKind};

/// Starting point `(c0, ce, a0)` of the least squares search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialGuess {
    pub nugget: f64,
    pub partial_sill: f64,
    pub range: f64,
}

impl InitialGuess {
    pub fn new(nugget: f64, partial_sill: f64, range: f64) -> Self {
        Self {
            nugget,
            partial_sill,
            range,
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.nugget, self.partial_sill, self.range]
    }
}

impl Default for InitialGuess {
    fn default() -> Self {
        Self::new(0.5, 0.5, 100.0)
    }
}

/// Why a single (model, direction) fit was abandoned. Never fatal for the run.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum FitError {
    #[error("{lags} lags are not enough to fit {params} parameters")]
    InsufficientLags { lags: usize, params: usize },
    #[error("optimizer failed: {0}")]
    Optimizer(String),
    #[error("optimizer did not converge: {0}")]
    NotConverged(String),
    #[error("parameter covariance could not be estimated")]
    Covariance,
    #[error("fitted parameters are not finite")]
    NonFinite,
}

/// Least squares fit of one model to one direction's semivariogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub model: ModelKind,
    pub nugget: f64,
    pub partial_sill: f64,
    /// The `a0` shape parameter, not the effective range.
    pub range_param: f64,
    pub sill: f64,
    pub effective_range: f64,
    /// Covariance of `(c0, ce, a0)`, scaled by the residual variance.
    pub covariance: Matrix3<f64>,
    /// Mean coefficient of variation of the three parameters.
    pub uncertainty: f64,
    pub rss: f64,
}

impl FittedModel {
    /// Builds the result from optimized `[c0, ce, a0]` and their covariance.
    pub fn from_params(
        model: ModelKind,
        params: [f64; 3],
        covariance: Matrix3<f64>,
        rss: f64,
    ) -> Result<Self, FitError> {
        if params.iter().any(|p| !p.is_finite()) {
            return Err(FitError::NonFinite);
        }
        if covariance.iter().any(|c| !c.is_finite()) {
            return Err(FitError::Covariance);
        }

        let uncertainty = uncertainty_score(&params, &covariance);
        if uncertainty.is_nan() {
            return Err(FitError::Covariance);
        }

        let [nugget, partial_sill, range_param] = params;
        let vgram = model.with_params(nugget, partial_sill, range_param);

        Ok(Self {
            model,
            nugget,
            partial_sill,
            range_param,
            sill: vgram.sill(),
            effective_range: vgram.effective_range(),
            covariance,
            uncertainty,
            rss,
        })
    }

    pub fn iso_variogram(&self) -> IsoVariogramType {
        self.model
            .with_params(self.nugget, self.partial_sill, self.range_param)
    }

    /// Fitted curve at lag distance `h`.
    pub fn variogram(&self, h: f64) -> f64 {
        self.iso_variogram().variogram(h)
    }
}

/// `mean_i(sqrt(cov[i, i]) / p_i)`, signed like the parameters themselves.
pub fn uncertainty_score(params: &[f64; 3], covariance: &Matrix3<f64>) -> f64 {
    params
        .iter()
        .enumerate()
        .map(|(i, p)| covariance[(i, i)].sqrt() / p)
        .sum::<f64>()
        / params.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FitOutcome {
    Fitted(FittedModel),
    Failed(FitError),
}

impl FitOutcome {
    /// Uncertainty score, `+inf` for a failed fit.
    pub fn uncertainty(&self) -> f64 {
        match self {
            FitOutcome::Fitted(fit) => fit.uncertainty,
            FitOutcome::Failed(_) => f64::INFINITY,
        }
    }

    pub fn fitted(&self) -> Option<&FittedModel> {
        match self {
            FitOutcome::Fitted(fit) => Some(fit),
            FitOutcome::Failed(_) => None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, FitOutcome::Fitted(_))
    }
}

impl From<Result<FittedModel, FitError>> for FitOutcome {
    fn from(result: Result<FittedModel, FitError>) -> Self {
        match result {
            Ok(fit) => FitOutcome::Fitted(fit),
            Err(err) => FitOutcome::Failed(err),
        }
    }
}

/// Per direction fits of the selected model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFit {
    pub model: ModelKind,
    /// One outcome per direction, in direction order.
    pub outcomes: Vec<FitOutcome>,
    /// Mean uncertainty over directions of every candidate that was fitted.
    pub candidate_scores: Vec<(ModelKind, f64)>,
}

impl ModelFit {
    /// Keeps the candidate with the smallest uncertainty averaged over all directions.
    ///
    /// Ties, including every candidate failing, go to the earliest candidate. Returns
    /// `None` only when `candidates` is empty.
    pub fn select(candidates: Vec<(ModelKind, Vec<FitOutcome>)>) -> Option<Self> {
        let candidate_scores = candidates
            .iter()
            .map(|(kind, outcomes)| (*kind, mean_uncertainty(outcomes)))
            .collect::<Vec<_>>();

        let mut best = 0;
        for (i, (_, score)) in candidate_scores.iter().enumerate() {
            if *score < candidate_scores[best].1 {
                best = i;
            }
        }

        let (model, outcomes) = candidates.into_iter().nth(best)?;
        Some(Self {
            model,
            outcomes,
            candidate_scores,
        })
    }

    pub fn nuggets(&self) -> Vec<f64> {
        self.map_fitted(|fit| fit.nugget)
    }

    pub fn sills(&self) -> Vec<f64> {
        self.map_fitted(|fit| fit.sill)
    }

    pub fn ranges(&self) -> Vec<f64> {
        self.map_fitted(|fit| fit.effective_range)
    }

    pub fn scores(&self) -> Vec<f64> {
        self.outcomes.iter().map(|o| o.uncertainty()).collect()
    }

    pub fn covariances(&self) -> Vec<Option<Matrix3<f64>>> {
        self.outcomes
            .iter()
            .map(|o| o.fitted().map(|fit| fit.covariance))
            .collect()
    }

    fn map_fitted(&self, f: impl Fn(&FittedModel) -> f64) -> Vec<f64> {
        self.outcomes
            .iter()
            .map(|o| o.fitted().map_or(f64::NAN, &f))
            .collect()
    }
}

fn mean_uncertainty(outcomes: &[FitOutcome]) -> f64 {
    if outcomes.is_empty() {
        return f64::INFINITY;
    }
    outcomes.iter().map(|o| o.uncertainty()).sum::<f64>() / outcomes.len() as f64
}
