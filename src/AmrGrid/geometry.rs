use crate::AmrGrid::index_box::{IndexBox, IntVect};
use serde::{Deserialize, Serialize};

/// Physical description of one level: index domain and the rectangle it maps to.
///
/// `dim` is checked when the geometry enters an [`AmrHierarchy`](crate::AmrGrid::hierarchy::AmrHierarchy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub domain: IndexBox,
    pub prob_lo: [f64; 3],
    pub prob_hi: [f64; 3],
    pub dim: usize,
}

impl Geometry {
    pub fn new(domain: IndexBox, prob_lo: [f64; 3], prob_hi: [f64; 3], dim: usize) -> Self {
        Self {
            domain,
            prob_lo,
            prob_hi,
            dim,
        }
    }
    pub fn cell_size(&self, d: usize) -> f64 {
        (self.prob_hi[d] - self.prob_lo[d]) / self.domain.length(d) as f64
    }
    pub fn cell_volume(&self) -> f64 {
        (0..self.dim).map(|d| self.cell_size(d)).product()
    }
    /// physical coordinates of a cell centre
    pub fn cell_center(&self, iv: IntVect) -> [f64; 3] {
        let mut x = [0.0; 3];
        for d in 0..self.dim {
            x[d] = self.prob_lo[d] + (iv[d] - self.domain.lo[d]) as f64 * self.cell_size(d)
                + 0.5 * self.cell_size(d);
        }
        x
    }
    /// geometry of the next finer level
    pub fn refine(&self, ratio: i32) -> Geometry {
        Geometry {
            domain: self.domain.refine(ratio, self.dim),
            ..self.clone()
        }
    }
}
