pub mod experimental;
pub mod model_variograms;
