/// embedded-boundary coverage of the boxes and cells of a level
pub mod eb;
/// mapping of a level's index space to physical space
pub mod geometry;
/// levels, refinement ratios and hierarchy-wide weighted reductions
/// # Examples
/// ```
/// use ThermoDivU::AmrGrid::geometry::Geometry;
/// use ThermoDivU::AmrGrid::hierarchy::{AmrHierarchy, AmrLevel};
/// use ThermoDivU::AmrGrid::index_box::IndexBox;
/// let geom0 = Geometry::new(IndexBox::new_2d([0, 0], [15, 15]), [0.0; 3], [1.0, 1.0, 0.0], 2);
/// let geom1 = geom0.refine(2);
/// let levels = vec![
///     AmrLevel::new(geom0, vec![IndexBox::new_2d([0, 0], [15, 15])]),
///     AmrLevel::new(geom1, vec![IndexBox::new_2d([8, 8], [23, 23])]),
/// ];
/// let hierarchy = AmrHierarchy::new(levels, vec![2]).unwrap();
/// assert!((hierarchy.uncovered_volume() - 1.0).abs() < 1e-12);
/// ```
pub mod hierarchy;
/// cell-index rectangles
pub mod index_box;
/// multi-component arrays over the boxes of a level
pub mod multifab;
/// parallel-for and deterministic reductions over the boxes of a level
pub mod parallel;
