use super::IsoVariogramModel;

/// `γ(h) = c0 + ce·(1 − exp(−|h| / a0))`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IsoExponential {
    pub nugget: f64,
    pub partial_sill: f64,
    pub range: f64,
}

impl IsoExponential {
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

impl IsoVariogramModel for IsoExponential {
    fn c_0(&self) -> f64 {
        self.nugget
    }

    fn partial_sill(&self) -> f64 {
        self.partial_sill
    }

    fn variogram(&self, h: f64) -> f64 {
        self.nugget + self.partial_sill * (1.0 - (-h.abs() / self.range).exp())
    }

    // the exponential model only approaches the sill, 95% of it is taken as the range
    fn effective_range(&self) -> f64 {
        -(1.0 - (0.95 * self.sill() - self.nugget) / self.partial_sill).ln() * self.range
    }
}
