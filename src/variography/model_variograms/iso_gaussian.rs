use super::IsoVariogramModel;

/// `γ(h) = c0 + ce·(1 − exp(−h² / a0²))`
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct IsoGaussian {
    pub nugget: f64,
    pub partial_sill: f64,
    pub range: f64,
}

impl IsoGaussian {
    pub fn new(nugget: f64, partial_sill: f64, range: f64) -> Self {
        Self {
            nugget,
            partial_sill,
            range,
        }
    }

    pub fn param_cnt() -> usize {
        3
    }

    pub fn update_from_slice(&mut self, params: &[f64]) {
        self.nugget = params[0];
        self.partial_sill = params[1];
        self.range = params[2];
    }
}

impl IsoVariogramModel for IsoGaussian {
    fn c_0(&self) -> f64 {
        self.nugget
    }

    fn partial_sill(&self) -> f64 {
        self.partial_sill
    }

    fn variogram(&self, h: f64) -> f64 {
        self.nugget + self.partial_sill * (1.0 - (-h * h / (self.range * self.range)).exp())
    }

    // a0 only enters squared, so a negative fitted a0 still gives a positive range
    fn effective_range(&self) -> f64 {
        let ratio = (0.95 * self.sill() - self.nugget) / self.partial_sill;
        (-(self.range * self.range) * (1.0 - ratio).ln()).sqrt()
    }
}
