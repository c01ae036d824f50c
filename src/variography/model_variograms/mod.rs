use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SemivariogramError;

pub mod fit;
pub mod iso_exponential;
#[cfg(feature = "fitting")]
pub mod iso_fitter;
pub mod iso_gaussian;
pub mod iso_spherical;

use iso_exponential::IsoExponential;
use iso_gaussian::IsoGaussian;
use iso_spherical::IsoSpherical;

/// Closed form semivariogram shape parameterised by nugget, partial sill and range.
pub trait IsoVariogramModel {
    fn c_0(&self) -> f64;
    fn partial_sill(&self) -> f64;
    fn variogram(&self, h: f64) -> f64;

    /// Separation at which the model is considered to have reached its sill.
    fn effective_range(&self) -> f64;

    fn sill(&self) -> f64 {
        self.c_0() + self.partial_sill()
    }
}

/// The theoretical shapes that can be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Exponential,
    Spherical,
    Gaussian,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::Exponential,
        ModelKind::Spherical,
        ModelKind::Gaussian,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            ModelKind::Exponential => "exponential",
            ModelKind::Spherical => "spherical",
            ModelKind::Gaussian => "gaussian",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ModelKind::Exponential => "Exponential Semivariogram Model",
            ModelKind::Spherical => "Spherical Semivariogram Model",
            ModelKind::Gaussian => "Gaussian Semivariogram Model",
        }
    }

    pub fn with_params(&self, nugget: f64, partial_sill: f64, range: f64) -> IsoVariogramType {
        match self {
            ModelKind::Exponential => {
                IsoVariogramType::Exponential(IsoExponential::new(nugget, partial_sill, range))
            }
            ModelKind::Spherical => {
                IsoVariogramType::Spherical(IsoSpherical::new(nugget, partial_sill, range))
            }
            ModelKind::Gaussian => {
                IsoVariogramType::Gaussian(IsoGaussian::new(nugget, partial_sill, range))
            }
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Which model(s) a run fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelSelection {
    #[default]
    #[serde(rename = "exponential")]
    Exponential,
    #[serde(rename = "spherical")]
    Spherical,
    #[serde(rename = "gaussian")]
    Gaussian,
    /// Fit every model and keep the one with the smallest mean uncertainty score.
    #[serde(rename = "best-guess", alias = "noidea")]
    BestGuess,
    /// Model fitting disabled.
    #[serde(rename = "none", alias = "nomodel")]
    None,
}

impl ModelSelection {
    pub fn candidates(&self) -> Vec<ModelKind> {
        match self {
            ModelSelection::Exponential => vec![ModelKind::Exponential],
            ModelSelection::Spherical => vec![ModelKind::Spherical],
            ModelSelection::Gaussian => vec![ModelKind::Gaussian],
            ModelSelection::BestGuess => ModelKind::ALL.to_vec(),
            ModelSelection::None => vec![],
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ModelSelection::Exponential => "exponential",
            ModelSelection::Spherical => "spherical",
            ModelSelection::Gaussian => "gaussian",
            ModelSelection::BestGuess => "best-guess",
            ModelSelection::None => "none",
        }
    }
}

impl From<ModelKind> for ModelSelection {
    fn from(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Exponential => ModelSelection::Exponential,
            ModelKind::Spherical => ModelSelection::Spherical,
            ModelKind::Gaussian => ModelSelection::Gaussian,
        }
    }
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ModelSelection {
    type Err = SemivariogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exponential" => Ok(ModelSelection::Exponential),
            "spherical" => Ok(ModelSelection::Spherical),
            "gaussian" => Ok(ModelSelection::Gaussian),
            "best-guess" | "noidea" => Ok(ModelSelection::BestGuess),
            "none" | "nomodel" => Ok(ModelSelection::None),
            _ => Err(SemivariogramError::InvalidModel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IsoVariogramType {
    Exponential(IsoExponential),
    Spherical(IsoSpherical),
    Gaussian(IsoGaussian),
}

impl IsoVariogramType {
    pub fn kind(&self) -> ModelKind {
        match self {
            IsoVariogramType::Exponential(_) => ModelKind::Exponential,
            IsoVariogramType::Spherical(_) => ModelKind::Spherical,
            IsoVariogramType::Gaussian(_) => ModelKind::Gaussian,
        }
    }

    pub fn param_cnt(&self) -> usize {
        match self {
            IsoVariogramType::Exponential(_) => IsoExponential::param_cnt(),
            IsoVariogramType::Spherical(_) => IsoSpherical::param_cnt(),
            IsoVariogramType::Gaussian(_) => IsoGaussian::param_cnt(),
        }
    }

    /// Sets `[nugget, partial_sill, range]`.
    pub fn update_params(&mut self, params: &[f64]) {
        match self {
            IsoVariogramType::Exponential(v) => v.update_from_slice(params),
            IsoVariogramType::Spherical(v) => v.update_from_slice(params),
            IsoVariogramType::Gaussian(v) => v.update_from_slice(params),
        }
    }
}

impl IsoVariogramModel for IsoVariogramType {
    fn c_0(&self) -> f64 {
        match self {
            IsoVariogramType::Exponential(v) => v.c_0(),
            IsoVariogramType::Spherical(v) => v.c_0(),
            IsoVariogramType::Gaussian(v) => v.c_0(),
        }
    }

    fn partial_sill(&self) -> f64 {
        match self {
            IsoVariogramType::Exponential(v) => v.partial_sill(),
            IsoVariogramType::Spherical(v) => v.partial_sill(),
            IsoVariogramType::Gaussian(v) => v.partial_sill(),
        }
    }

    fn variogram(&self, h: f64) -> f64 {
        match self {
            IsoVariogramType::Exponential(v) => v.variogram(h),
            IsoVariogramType::Spherical(v) => v.variogram(h),
            IsoVariogramType::Gaussian(v) => v.variogram(h),
        }
    }

    fn effective_range(&self) -> f64 {
        match self {
            IsoVariogramType::Exponential(v) => v.effective_range(),
            IsoVariogramType::Spherical(v) => v.effective_range(),
            IsoVariogramType::Gaussian(v) => v.effective_range(),
        }
    }
}
