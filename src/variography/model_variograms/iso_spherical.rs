use super::IsoVariogramModel;

/// `γ(h) = c0 + ce·(1.5·h/a0 − 0.5·(h/a0)³)` up to `a0`, `c0 + ce` beyond.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct IsoSpherical {
    pub nugget: f64,
    pub partial_sill: f64,
    pub range: f64,
}

impl IsoSpherical {
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

impl IsoVariogramModel for IsoSpherical {
    fn c_0(&self) -> f64 {
        self.nugget
    }

    fn partial_sill(&self) -> f64 {
        self.partial_sill
    }

    fn variogram(&self, h: f64) -> f64 {
        let h = h.abs();
        if h <= self.range {
            let hr = h / self.range;
            return self.nugget + self.partial_sill * (1.5 * hr - 0.5 * hr.powi(3));
        }
        self.nugget + self.partial_sill
    }

    fn effective_range(&self) -> f64 {
        self.range
    }
}
