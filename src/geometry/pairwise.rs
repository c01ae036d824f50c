use nalgebra::Point2;
use ordered_float::OrderedFloat;

/// Geometry of one unordered sample pair `(tail, head)` with `tail < head`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseObservation {
    pub tail: usize,
    pub head: usize,
    pub distance: f64,
    /// Direction from tail to head in degrees, within (-180, 180].
    pub angle: f64,
}

impl PairwiseObservation {
    #[inline(always)]
    pub fn squared_difference(&self, values: &[f64]) -> f64 {
        let diff = values[self.head] - values[self.tail];
        diff * diff
    }
}

/// All n(n-1)/2 sample pairs, computed once and shared read-only by every direction.
#[derive(Debug, Clone)]
pub struct PairwiseGeometry {
    pairs: Vec<PairwiseObservation>,
    max_distance: Option<f64>,
}

impl PairwiseGeometry {
    pub fn new(points: &[Point2<f64>]) -> Self {
        let n = points.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);

        for (tail, p1) in points.iter().enumerate() {
            for (head, p2) in points.iter().enumerate().skip(tail + 1) {
                let offset = p2 - p1;
                pairs.push(PairwiseObservation {
                    tail,
                    head,
                    distance: offset.norm(),
                    angle: normalize_angle(offset.y.atan2(offset.x).to_degrees()),
                });
            }
        }

        let max_distance = pairs
            .iter()
            .map(|pair| OrderedFloat(pair.distance))
            .max()
            .map(|d| d.0);

        Self {
            pairs,
            max_distance,
        }
    }

    pub fn pairs(&self) -> &[PairwiseObservation] {
        &self.pairs
    }

    /// Largest pairwise distance, `None` when fewer than two points were given.
    pub fn max_distance(&self) -> Option<f64> {
        self.max_distance
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Maps an arctangent result onto (-180, 180]; -180 becomes 180.
#[inline(always)]
pub fn normalize_angle(angle: f64) -> f64 {
    if angle <= -180.0 {
        180.0
    } else {
        angle
    }
}
