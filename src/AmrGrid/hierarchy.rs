//! Block-structured level hierarchy: geometry, grids and EB data of every level, plus the
//! volume weights used by hierarchy-wide reductions.
use crate::AmrGrid::eb::EbFactory;
use crate::AmrGrid::geometry::Geometry;
use crate::AmrGrid::index_box::IndexBox;
use crate::AmrGrid::multifab::MultiFab;
use crate::AmrGrid::parallel::{parallel_for_boxes, parallel_sum};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("hierarchy has no levels")]
    NoLevels,
    #[error("{levels} levels need {expected} refinement ratios, got {got}")]
    RefRatioCount {
        levels: usize,
        expected: usize,
        got: usize,
    },
    #[error("refinement ratio {0} must be at least 2")]
    BadRefRatio(i32),
    #[error("level {level} has dimension {got}, level 0 has {expected}")]
    DimensionMismatch {
        level: usize,
        expected: usize,
        got: usize,
    },
    #[error("box {bx:?} of level {level} lies outside of the domain")]
    BoxOutsideDomain { level: usize, bx: IndexBox },
    #[error("box {bx:?} of level {level} cannot be coarsened by {ratio}")]
    NotCoarsenable {
        level: usize,
        bx: IndexBox,
        ratio: i32,
    },
    #[error("grids of dimension {0}, only 2D and 3D are supported")]
    BadDimension(usize),
    #[error("boxes {a:?} and {b:?} of level {level} overlap")]
    OverlappingBoxes {
        level: usize,
        a: IndexBox,
        b: IndexBox,
    },
    #[error("box {bx:?} of level {level} is not covered by the grids of level {coarse}")]
    NotNested {
        level: usize,
        coarse: usize,
        bx: IndexBox,
    },
    #[error("domain of level {level} is not the refined domain of level {coarse}")]
    DomainMismatch { level: usize, coarse: usize },
    #[error("EB data of level {0} does not match its grids")]
    EbLayoutMismatch(usize),
    #[error("level {level} out of range, finest level is {finest}")]
    LevelOutOfRange { level: usize, finest: usize },
    #[error("expected one field per level ({expected}), got {got}")]
    LevelCountMismatch { expected: usize, got: usize },
}

#[derive(Debug, Clone)]
pub struct AmrLevel {
    pub geom: Geometry,
    pub grids: Vec<IndexBox>,
    pub eb: Option<EbFactory>,
}

impl AmrLevel {
    pub fn new(geom: Geometry, grids: Vec<IndexBox>) -> Self {
        Self {
            geom,
            grids,
            eb: None,
        }
    }
    pub fn with_eb(mut self, eb: EbFactory) -> Self {
        self.eb = Some(eb);
        self
    }
}

#[derive(Debug, Clone)]
pub struct AmrHierarchy {
    levels: Vec<AmrLevel>,
    ref_ratio: Vec<i32>,
    /// vfrac * cell volume, zero under finer levels
    weights: Vec<MultiFab>,
    /// sum of `weights`, refreshed together with them
    uncovered_vol: f64,
}

impl AmrHierarchy {
    pub fn new(levels: Vec<AmrLevel>, ref_ratio: Vec<i32>) -> Result<Self, GridError> {
        Self::validate(&levels, &ref_ratio)?;
        let mut hierarchy = Self {
            levels,
            ref_ratio,
            weights: Vec::new(),
            uncovered_vol: 0.0,
        };
        hierarchy.update_weights();
        Ok(hierarchy)
    }

    pub fn single_level(geom: Geometry, grids: Vec<IndexBox>) -> Result<Self, GridError> {
        Self::new(vec![AmrLevel::new(geom, grids)], vec![])
    }

    fn validate(levels: &[AmrLevel], ref_ratio: &[i32]) -> Result<(), GridError> {
        let first = levels.first().ok_or(GridError::NoLevels)?;
        if ref_ratio.len() != levels.len() - 1 {
            return Err(GridError::RefRatioCount {
                levels: levels.len(),
                expected: levels.len() - 1,
                got: ref_ratio.len(),
            });
        }
        if let Some(&r) = ref_ratio.iter().find(|&&r| r < 2) {
            return Err(GridError::BadRefRatio(r));
        }
        let dim = first.geom.dim;
        if dim != 2 && dim != 3 {
            return Err(GridError::BadDimension(dim));
        }
        for (lev, level) in levels.iter().enumerate() {
            if level.geom.dim != dim {
                return Err(GridError::DimensionMismatch {
                    level: lev,
                    expected: dim,
                    got: level.geom.dim,
                });
            }
            if let Some(bx) = level
                .grids
                .iter()
                .find(|bx| !level.geom.domain.contains_box(bx))
            {
                return Err(GridError::BoxOutsideDomain {
                    level: lev,
                    bx: *bx,
                });
            }
            for (i, a) in level.grids.iter().enumerate() {
                if let Some(b) = level.grids[i + 1..].iter().find(|b| a.intersect(b).is_some()) {
                    return Err(GridError::OverlappingBoxes {
                        level: lev,
                        a: *a,
                        b: *b,
                    });
                }
            }
            if let Some(eb) = &level.eb {
                if eb.volume_fractions().boxes() != level.grids.as_slice() {
                    return Err(GridError::EbLayoutMismatch(lev));
                }
            }
            if lev > 0 {
                let ratio = ref_ratio[lev - 1];
                if levels[lev - 1].geom.domain.refine(ratio, dim) != level.geom.domain {
                    return Err(GridError::DomainMismatch {
                        level: lev,
                        coarse: lev - 1,
                    });
                }
                if let Some(bx) = level.grids.iter().find(|bx| !bx.is_coarsenable(ratio, dim)) {
                    return Err(GridError::NotCoarsenable {
                        level: lev,
                        bx: *bx,
                        ratio,
                    });
                }
                let coarse_grids = &levels[lev - 1].grids;
                if let Some(bx) = level.grids.iter().find(|bx| {
                    bx.coarsen(ratio, dim)
                        .cells()
                        .any(|iv| !coarse_grids.iter().any(|c| c.contains(iv)))
                }) {
                    return Err(GridError::NotNested {
                        level: lev,
                        coarse: lev - 1,
                        bx: *bx,
                    });
                }
            }
        }
        Ok(())
    }

    /// recomputes the reduction weights; needed whenever grids or EB data change
    fn update_weights(&mut self) {
        let dim = self.dim();
        let finest = self.finest_level();
        let mut weights = Vec::with_capacity(self.levels.len());
        for lev in 0..=finest {
            let level = &self.levels[lev];
            let cell_vol = level.geom.cell_volume();
            let covering: Vec<IndexBox> = if lev < finest {
                let ratio = self.ref_ratio[lev];
                self.levels[lev + 1]
                    .grids
                    .iter()
                    .map(|bx| bx.coarsen(ratio, dim))
                    .collect()
            } else {
                Vec::new()
            };
            let mut w = MultiFab::new(&level.grids, 1, 0, dim);
            let eb = level.eb.as_ref();
            parallel_for_boxes(&mut w, |box_no, bx, fab| {
                for iv in bx.cells() {
                    let vf = eb.map_or(1.0, |eb| eb.vfrac(box_no, iv));
                    fab.set(iv, 0, vf * cell_vol);
                }
                for cbx in covering.iter().filter_map(|c| c.intersect(bx)) {
                    for iv in cbx.cells() {
                        fab.set(iv, 0, 0.0);
                    }
                }
            });
            weights.push(w);
        }
        self.uncovered_vol = weights
            .iter()
            .map(|w| parallel_sum(w, |_, bx, fab| bx.cells().map(|iv| fab.get(iv, 0)).sum()))
            .sum();
        self.weights = weights;
        debug!(
            "reduction weights updated, uncovered volume {}",
            self.uncovered_volume()
        );
    }

    pub fn dim(&self) -> usize {
        self.levels[0].geom.dim
    }
    pub fn finest_level(&self) -> usize {
        self.levels.len() - 1
    }
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }
    pub fn level(&self, lev: usize) -> &AmrLevel {
        &self.levels[lev]
    }
    pub fn levels(&self) -> &[AmrLevel] {
        &self.levels
    }
    pub fn geom(&self, lev: usize) -> &Geometry {
        &self.levels[lev].geom
    }
    pub fn grids(&self, lev: usize) -> &[IndexBox] {
        &self.levels[lev].grids
    }
    pub fn eb(&self, lev: usize) -> Option<&EbFactory> {
        self.levels[lev].eb.as_ref()
    }
    /// refinement ratio between `lev` and `lev + 1`
    pub fn ref_ratio(&self, lev: usize) -> i32 {
        self.ref_ratio[lev]
    }

    /// replaces the EB data of a level and refreshes the reduction weights
    pub fn set_eb(&mut self, lev: usize, eb: Option<EbFactory>) -> Result<(), GridError> {
        if lev > self.finest_level() {
            return Err(GridError::LevelOutOfRange {
                level: lev,
                finest: self.finest_level(),
            });
        }
        if let Some(eb) = &eb {
            if eb.volume_fractions().boxes() != self.levels[lev].grids.as_slice() {
                return Err(GridError::EbLayoutMismatch(lev));
            }
        }
        self.levels[lev].eb = eb;
        self.update_weights();
        Ok(())
    }

    /// vfrac * cell volume on cells not covered by a finer level, zero elsewhere
    pub fn cell_weights(&self, lev: usize) -> &MultiFab {
        &self.weights[lev]
    }

    /// volume of the fluid part of the domain, each point counted once on its finest level
    pub fn uncovered_volume(&self) -> f64 {
        self.uncovered_vol
    }

    /// volume-weighted integral of component `comp` of a per-level field over the hierarchy.
    ///
    /// Levels are summed in order and boxes in box order, so the result is reproducible.
    pub fn weighted_sum(&self, fields: &[&MultiFab], comp: usize) -> Result<f64, GridError> {
        if fields.len() != self.num_levels() {
            return Err(GridError::LevelCountMismatch {
                expected: self.num_levels(),
                got: fields.len(),
            });
        }
        let total = fields
            .iter()
            .zip(self.weights.iter())
            .map(|(field, w)| {
                parallel_sum(field, |box_no, bx, fab| {
                    let wfab = w.fab(box_no);
                    // zero-weight cells (solid or under a finer level) may hold no valid data
                    bx.cells()
                        .map(|iv| (fab.get(iv, comp), wfab.get(iv, 0)))
                        .filter(|&(_, w)| w != 0.0)
                        .map(|(v, w)| v * w)
                        .sum()
                })
            })
            .sum();
        Ok(total)
    }
}
