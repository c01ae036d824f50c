pub mod error;
pub mod geometry;
pub mod semivariogram;
pub mod spatial_database;
pub mod variography;

pub mod prelude {

    pub mod re_exports {
        pub use nalgebra;
    }

    pub use crate::error::{Result, SemivariogramError};
    pub use crate::geometry::variogram_tolerance::{DirectionSpec, VariogramKind};
    pub use crate::semivariogram::{
        semivariogram, semivariogram_from_columns, SemivariogramParams, SemivariogramResult,
    };
    pub use crate::spatial_database::{PointSet, SamplePoint};
    pub use crate::variography::experimental::ExperimentalVariogram;
    pub use crate::variography::model_variograms::fit::{
        FitError, FitOutcome, FittedModel, InitialGuess, ModelFit,
    };
    pub use crate::variography::model_variograms::{ModelKind, ModelSelection};
}
