use crate::AmrGrid::index_box::{IndexBox, IntVect};

/// Dense multi-component array over one (ghost-grown) box.
///
/// Components are stored one after another, cells of a component with `i` running fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct Fab {
    bx: IndexBox,
    ncomp: usize,
    data: Vec<f64>,
}

impl Fab {
    pub fn new(bx: IndexBox, ncomp: usize) -> Self {
        Self {
            bx,
            ncomp,
            data: vec![0.0; bx.num_cells() * ncomp],
        }
    }
    /// box covered by the array, ghost cells included
    pub fn fab_box(&self) -> &IndexBox {
        &self.bx
    }
    pub fn ncomp(&self) -> usize {
        self.ncomp
    }
    #[inline]
    fn index(&self, iv: IntVect, n: usize) -> usize {
        debug_assert!(self.bx.contains(iv), "{:?} outside of {:?}", iv, self.bx);
        debug_assert!(n < self.ncomp);
        let (nx, ny) = (self.bx.length(0), self.bx.length(1));
        let i = (iv[0] - self.bx.lo[0]) as usize;
        let j = (iv[1] - self.bx.lo[1]) as usize;
        let k = (iv[2] - self.bx.lo[2]) as usize;
        n * self.bx.num_cells() + (k * ny + j) * nx + i
    }
    #[inline]
    pub fn get(&self, iv: IntVect, n: usize) -> f64 {
        self.data[self.index(iv, n)]
    }
    #[inline]
    pub fn set(&mut self, iv: IntVect, n: usize, value: f64) {
        let idx = self.index(iv, n);
        self.data[idx] = value;
    }
    #[inline]
    pub fn get_mut(&mut self, iv: IntVect, n: usize) -> &mut f64 {
        let idx = self.index(iv, n);
        &mut self.data[idx]
    }
    /// copies the `ncomp` components starting at `n` of cell `iv` into `out`
    pub fn get_components(&self, iv: IntVect, n: usize, out: &mut [f64]) {
        for (c, value) in out.iter_mut().enumerate() {
            *value = self.get(iv, n + c);
        }
    }
    pub fn set_val(&mut self, value: f64) {
        self.data.iter_mut().for_each(|v| *v = value);
    }
}

/// One [`Fab`] per valid box of a level, all with the same ghost width and component count.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFab {
    pub(crate) boxes: Vec<IndexBox>,
    pub(crate) fabs: Vec<Fab>,
    ncomp: usize,
    ngrow: usize,
    dim: usize,
}

impl MultiFab {
    pub fn new(boxes: &[IndexBox], ncomp: usize, ngrow: usize, dim: usize) -> Self {
        let fabs = boxes
            .iter()
            .map(|bx| Fab::new(bx.grow(ngrow as i32, dim), ncomp))
            .collect();
        Self {
            boxes: boxes.to_vec(),
            fabs,
            ncomp,
            ngrow,
            dim,
        }
    }
    pub fn ncomp(&self) -> usize {
        self.ncomp
    }
    pub fn n_grow(&self) -> usize {
        self.ngrow
    }
    pub fn dim(&self) -> usize {
        self.dim
    }
    pub fn n_boxes(&self) -> usize {
        self.boxes.len()
    }
    pub fn boxes(&self) -> &[IndexBox] {
        &self.boxes
    }
    pub fn valid_box(&self, box_no: usize) -> &IndexBox {
        &self.boxes[box_no]
    }
    pub fn fab(&self, box_no: usize) -> &Fab {
        &self.fabs[box_no]
    }
    pub fn fab_mut(&mut self, box_no: usize) -> &mut Fab {
        &mut self.fabs[box_no]
    }
    /// same box list as `other`
    pub fn same_layout(&self, other: &MultiFab) -> bool {
        self.boxes == other.boxes
    }
    /// value at a valid cell, looked up among all boxes
    pub fn value_at(&self, iv: IntVect, n: usize) -> Option<f64> {
        self.boxes
            .iter()
            .position(|bx| bx.contains(iv))
            .map(|b| self.fabs[b].get(iv, n))
    }
    /// sets every cell, ghost cells included
    pub fn set_val(&mut self, value: f64) {
        self.fabs.iter_mut().for_each(|fab| fab.set_val(value));
    }
    /// sets component `n` on the valid cells
    pub fn set_val_comp(&mut self, value: f64, n: usize) {
        for (bx, fab) in self.boxes.iter().zip(self.fabs.iter_mut()) {
            for iv in bx.cells() {
                fab.set(iv, n, value);
            }
        }
    }
    /// adds `value` to component `n` on the valid cells
    pub fn plus(&mut self, value: f64, n: usize) {
        for (bx, fab) in self.boxes.iter().zip(self.fabs.iter_mut()) {
            for iv in bx.cells() {
                *fab.get_mut(iv, n) += value;
            }
        }
    }
    /// copies `ncomp` components of the valid cells of `src` (same layout) into `self`
    pub fn copy_from(&mut self, src: &MultiFab, src_comp: usize, dst_comp: usize, ncomp: usize) {
        debug_assert!(self.same_layout(src));
        for (b, bx) in self.boxes.iter().enumerate() {
            let (dst, from) = (&mut self.fabs[b], &src.fabs[b]);
            for n in 0..ncomp {
                for iv in bx.cells() {
                    dst.set(iv, dst_comp + n, from.get(iv, src_comp + n));
                }
            }
        }
    }
    /// minimum and maximum of component `n` over the valid cells
    pub fn min_max(&self, n: usize) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (bx, fab) in self.boxes.iter().zip(self.fabs.iter()) {
            for iv in bx.cells() {
                let v = fab.get(iv, n);
                min = min.min(v);
                max = max.max(v);
            }
        }
        (min, max)
    }
}
