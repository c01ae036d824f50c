use thiserror::Error;

/// Fatal errors raised before any semivariogram computation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemivariogramError {
    #[error("x, y and v must have the same length (got {x}, {y} and {v})")]
    InputShape { x: usize, y: usize, v: usize },

    #[error("direction {0} is outside [-180, 180]")]
    InvalidDirection(f64),

    #[error(
        "direction {0} is negative, which is not allowed for directional semivariograms"
    )]
    NegativeDirection(f64),

    #[error("tolerance {0} is outside [0, 180]")]
    InvalidTolerance(f64),

    #[error(
        "unknown semivariogram type '{0}', choose omnidirectional, directional or directional+orientational"
    )]
    InvalidMode(String),

    #[error(
        "unknown semivariogram model '{0}', choose exponential, spherical, gaussian, best-guess or none"
    )]
    InvalidModel(String),

    #[error("number of lags must be at least 1")]
    InvalidLagCount,

    #[error("at least 2 sample points are required, got {0}")]
    DegenerateInput(usize),
}

pub type Result<T> = std::result::Result<T, SemivariogramError>;
