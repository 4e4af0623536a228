use serde::{Deserialize, Serialize};

/// Cell index; the third entry is 0 in 2D.
pub type IntVect = [i32; 3];

/// Inclusive rectangle of cell indices `lo..=hi`.
///
/// Only the first `dim` axes take part in grow/coarsen/refine; the remaining axes keep
/// their (single-cell) extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexBox {
    pub lo: IntVect,
    pub hi: IntVect,
}

impl IndexBox {
    pub fn new(lo: IntVect, hi: IntVect) -> Self {
        Self { lo, hi }
    }
    /// 2D box, the third axis collapsed to index 0
    pub fn new_2d(lo: [i32; 2], hi: [i32; 2]) -> Self {
        Self {
            lo: [lo[0], lo[1], 0],
            hi: [hi[0], hi[1], 0],
        }
    }
    pub fn is_empty(&self) -> bool {
        (0..3).any(|d| self.hi[d] < self.lo[d])
    }
    /// number of cells along axis `d`
    pub fn length(&self, d: usize) -> usize {
        (self.hi[d] - self.lo[d] + 1).max(0) as usize
    }
    pub fn num_cells(&self) -> usize {
        self.length(0) * self.length(1) * self.length(2)
    }
    pub fn contains(&self, iv: IntVect) -> bool {
        (0..3).all(|d| self.lo[d] <= iv[d] && iv[d] <= self.hi[d])
    }
    pub fn contains_box(&self, other: &IndexBox) -> bool {
        other.is_empty() || (self.contains(other.lo) && self.contains(other.hi))
    }
    pub fn intersect(&self, other: &IndexBox) -> Option<IndexBox> {
        let mut lo = [0; 3];
        let mut hi = [0; 3];
        for d in 0..3 {
            lo[d] = self.lo[d].max(other.lo[d]);
            hi[d] = self.hi[d].min(other.hi[d]);
        }
        let bx = IndexBox { lo, hi };
        if bx.is_empty() { None } else { Some(bx) }
    }
    pub fn grow(&self, n: i32, dim: usize) -> IndexBox {
        let mut bx = *self;
        for d in 0..dim {
            bx.lo[d] -= n;
            bx.hi[d] += n;
        }
        bx
    }
    pub fn coarsen(&self, ratio: i32, dim: usize) -> IndexBox {
        let mut bx = *self;
        for d in 0..dim {
            bx.lo[d] = self.lo[d].div_euclid(ratio);
            bx.hi[d] = self.hi[d].div_euclid(ratio);
        }
        bx
    }
    pub fn refine(&self, ratio: i32, dim: usize) -> IndexBox {
        let mut bx = *self;
        for d in 0..dim {
            bx.lo[d] = self.lo[d] * ratio;
            bx.hi[d] = (self.hi[d] + 1) * ratio - 1;
        }
        bx
    }
    /// true when coarsening then refining gives back the same box
    pub fn is_coarsenable(&self, ratio: i32, dim: usize) -> bool {
        self.coarsen(ratio, dim).refine(ratio, dim) == *self
    }
    /// nearest index of the box to `iv`
    pub fn clamp(&self, iv: IntVect) -> IntVect {
        let mut out = iv;
        for d in 0..3 {
            out[d] = iv[d].clamp(self.lo[d], self.hi[d]);
        }
        out
    }
    /// iterates the cells with `i` running fastest
    pub fn cells(&self) -> impl Iterator<Item = IntVect> + '_ {
        let (lo, hi) = (self.lo, self.hi);
        (lo[2]..=hi[2]).flat_map(move |k| {
            (lo[1]..=hi[1]).flat_map(move |j| (lo[0]..=hi[0]).map(move |i| [i, j, k]))
        })
    }
}

/// coarse index of a fine cell
pub fn coarsen_iv(iv: IntVect, ratio: i32, dim: usize) -> IntVect {
    let mut out = iv;
    for d in 0..dim {
        out[d] = iv[d].div_euclid(ratio);
    }
    out
}
