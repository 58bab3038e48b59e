//! Tree compartment traversal
use crate::tree::{Bud, TreeSegment};

pub trait CompartmentVisitor {
    //! Visitor for the accumulate-down walk of a tree
    //!
    //! The walk enters an axis, visits its compartments from the tip towards the base and
    //! leaves the axis. Child axes of a branching point are walked completely, in order, when
    //! the branching point is reached.

    /// Called before the first compartment of an axis
    fn begin_axis(&mut self) {}

    /// Visit the terminating bud of an axis
    fn visit_bud(&mut self, _bud: &Bud) {}

    /// Visit a tree segment
    fn visit_segment(&mut self, _segment: &TreeSegment) {}

    /// Called after the last compartment of an axis
    fn end_axis(&mut self) {}
}
