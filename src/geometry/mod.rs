pub mod pairwise;
pub mod variogram_tolerance;
