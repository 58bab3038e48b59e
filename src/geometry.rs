//! Geometry assembly
//!
//! Assemblers turn the collected records into [PolyData] primitives: swept tubes for axes,
//! two triangle kites for leaves and lines for petioles.
mod leaf;
mod petiole;
mod polydata;
pub mod spline;
mod tube;

pub use leaf::assemble_leaf;
pub use petiole::assemble_petiole;
pub use polydata::{PolyData, RenderHints, ScalarArray};
pub use tube::{Centerline, TubeAssembler};
