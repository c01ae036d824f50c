use itertools::izip;
use nalgebra::Matrix3;
use rmpfit::{MPConfig, MPFitter, MPResult, MPSuccess};

use crate::variography::experimental::ExperimentalVariogram;

use super::fit::{FitError, FitOutcome, FittedModel, InitialGuess};
use super::{IsoVariogramModel, IsoVariogramType, ModelKind};

/// Unweighted Levenberg-Marquardt fit of one iso model to an experimental semivariogram.
pub struct IsoVariogramFitter {
    pub lags: Vec<f64>,
    pub exp_var: Vec<f64>,
    pub variogram: IsoVariogramType,
}

impl IsoVariogramFitter {
    pub fn new(lags: Vec<f64>, exp_var: Vec<f64>, model: ModelKind) -> Self {
        Self {
            lags,
            exp_var,
            variogram: model.with_params(0.0, 0.0, 1.0),
        }
    }

    pub fn from_experimental(vgram: &ExperimentalVariogram, model: ModelKind) -> Self {
        Self::new(vgram.lag_centers(), vgram.semivariance.clone(), model)
    }

    pub fn fit(&mut self, guess: InitialGuess) -> Result<FittedModel, FitError> {
        let n_params = self.variogram.param_cnt();
        let n_points = self.lags.len();
        if n_points <= n_params {
            return Err(FitError::InsufficientLags {
                lags: n_points,
                params: n_params,
            });
        }

        let mut params = guess.to_array();
        let status = self
            .mpfit(&mut params, None, &MPConfig::default())
            .map_err(|e| FitError::Optimizer(format!("{}", e)))?;

        // running out of iterations or stalling on a tolerance is not convergence
        if !matches!(
            status.success,
            MPSuccess::Chi | MPSuccess::Par | MPSuccess::Both | MPSuccess::Dir
        ) {
            return Err(FitError::NotConverged(format!("{:?}", status.success)));
        }

        if status.covar.len() != n_params * n_params {
            return Err(FitError::Covariance);
        }

        // MPFIT reports the unscaled covariance, rescale by the residual variance
        let residual_variance = status.best_norm / (n_points - n_params) as f64;
        let covariance = Matrix3::from_row_slice(&status.covar) * residual_variance;

        FittedModel::from_params(
            self.variogram.kind(),
            params,
            covariance,
            status.best_norm,
        )
    }
}

impl MPFitter for IsoVariogramFitter {
    fn eval(&self, params: &[f64], deviates: &mut [f64]) -> MPResult<()> {
        let mut variogram = self.variogram;
        variogram.update_params(params);

        for (d, x, y) in izip!(deviates.iter_mut(), self.lags.iter(), self.exp_var.iter()) {
            *d = *y - variogram.variogram(*x);
        }

        Ok(())
    }

    fn number_of_points(&self) -> usize {
        self.lags.len()
    }
}

/// Fits `model` to `vgram`, recording any failure in the outcome instead of returning it.
pub fn fit_model(
    vgram: &ExperimentalVariogram,
    model: ModelKind,
    guess: InitialGuess,
) -> FitOutcome {
    IsoVariogramFitter::from_experimental(vgram, model)
        .fit(guess)
        .into()
}
