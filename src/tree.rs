//! Lignum tree structure
//!
//! Read-only rendition of the compartments produced by the growth model. A tree is a root
//! [Axis]; an axis is a base to tip sequence of [Compartment]s ending in a [Bud], and child
//! axes attach to their mother axis at a [BranchingPoint].
pub mod xml;

use crate::traits::CompartmentVisitor;
use crate::types::{Error, Point, Result};
use nalgebra::Vector3;
use std::fmt;

/// Plant morphology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Morphology {
    /// Broadleaved tree with kite shaped leaves
    Broadleaved,
    /// Coniferous tree, foliage is a property of the segments
    Coniferous,
}

impl Morphology {
    /// Classify a tree from its segment type and leaf shape.
    ///
    /// `Cf` is coniferous. `Hw` is broadleaved if the leaf shape is `Kite` or the tree has no
    /// leaves at all. Everything else is unsupported.
    pub fn classify(segment_type: &str, leaf_shape: Option<&str>) -> Result<Self> {
        match (segment_type, leaf_shape) {
            ("Cf", _) => Ok(Self::Coniferous),
            ("Hw", None) | ("Hw", Some("Kite")) => Ok(Self::Broadleaved),
            ("Hw", Some(shape)) => Err(Error::UnsupportedMorphology(format!(
                "leaf type {shape} not yet supported"
            ))),
            (other, _) => Err(Error::UnsupportedMorphology(format!(
                "segment type \"{other}\" is neither Cf nor Hw"
            ))),
        }
    }

    /// Segment type tag used in the serialized format
    pub fn segment_type(&self) -> &'static str {
        match self {
            Self::Broadleaved => "Hw",
            Self::Coniferous => "Cf",
        }
    }
}

impl fmt::Display for Morphology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Broadleaved => write!(f, "Broadleaved tree"),
            Self::Coniferous => write!(f, "Coniferous tree"),
        }
    }
}

/// A tree
#[derive(Debug, Clone)]
pub struct Tree {
    morphology: Morphology,
    axis: Axis,
}

impl Tree {
    /// Create a tree from its root axis
    pub fn new(morphology: Morphology, axis: Axis) -> Self {
        Self { morphology, axis }
    }

    /// Morphology of the tree
    pub fn morphology(&self) -> Morphology {
        self.morphology
    }

    /// Root axis
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    /// Walk the tree with `visitor`
    pub fn walk_down<V: CompartmentVisitor>(&self, visitor: &mut V) {
        walk_down(&self.axis, visitor);
    }

    /// Number of axes in the tree
    pub fn axis_count(&self) -> usize {
        fn count(axis: &Axis) -> usize {
            1 + axis
                .compartments
                .iter()
                .map(|c| match c {
                    Compartment::BranchingPoint(bp) => bp.axes.iter().map(count).sum(),
                    _ => 0,
                })
                .sum::<usize>()
        }
        count(&self.axis)
    }
}

/// Walk `axis` from its tip towards its base.
///
/// Child axes are walked completely when their branching point is reached, in the order they
/// are stored.
pub fn walk_down<V: CompartmentVisitor>(axis: &Axis, visitor: &mut V) {
    visitor.begin_axis();
    for compartment in axis.compartments.iter().rev() {
        match compartment {
            Compartment::Bud(bud) => visitor.visit_bud(bud),
            Compartment::Segment(segment) => visitor.visit_segment(segment),
            Compartment::BranchingPoint(bp) => {
                for child in &bp.axes {
                    walk_down(child, visitor);
                }
            }
        }
    }
    visitor.end_axis();
}

/// An axis: tree segments and branching points from base to tip, terminated by a bud
#[derive(Debug, Clone, Default)]
pub struct Axis {
    /// Compartments in base to tip order
    pub compartments: Vec<Compartment>,
}

impl Axis {
    /// Create an empty axis
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a compartment at the tip end
    pub fn push(&mut self, compartment: Compartment) {
        self.compartments.push(compartment);
    }

    /// Number of tree segments in the axis (child axes excluded)
    pub fn segment_count(&self) -> usize {
        self.compartments
            .iter()
            .filter(|c| matches!(c, Compartment::Segment(_)))
            .count()
    }
}

/// Tree compartment
#[derive(Debug, Clone)]
pub enum Compartment {
    /// Tree segment
    Segment(TreeSegment),
    /// Branching point with child axes
    BranchingPoint(BranchingPoint),
    /// Terminating bud
    Bud(Bud),
}

/// Branching point
#[derive(Debug, Clone)]
pub struct BranchingPoint {
    /// Position
    pub point: Point,
    /// Direction
    pub direction: Vector3<f64>,
    /// Child axes
    pub axes: Vec<Axis>,
}

/// Bud
#[derive(Debug, Clone)]
pub struct Bud {
    /// Position
    pub point: Point,
    /// Direction
    pub direction: Vector3<f64>,
}

/// Tree segment
#[derive(Debug, Clone)]
pub struct TreeSegment {
    /// Base point
    pub point: Point,
    /// Direction
    pub direction: Vector3<f64>,
    /// Length
    pub length: f64,
    /// Radius
    pub radius: f64,
    /// Heartwood radius
    pub heartwood_radius: f64,
    /// Foliage mass
    pub foliage_mass: f64,
    /// Incoming radiation
    pub qin: f64,
    /// Absorbed radiation
    pub qabs: f64,
    /// Photosynthesis
    pub photosynthesis: f64,
    /// Morphology specific data
    pub kind: SegmentKind,
}

impl TreeSegment {
    /// End point of the segment
    pub fn end_point(&self) -> Point {
        let norm = self.direction.norm();
        if norm > 0.0 {
            self.point + self.direction * (self.length / norm)
        } else {
            self.point
        }
    }

    /// Leaves of a broadleaved segment, empty for conifers
    pub fn leaves(&self) -> &[BroadLeaf] {
        match &self.kind {
            SegmentKind::Broadleaved { leaves } => leaves,
            SegmentKind::Coniferous { .. } => &[],
        }
    }

    /// Radius to the foliage limit, only defined for conifers
    pub fn foliage_radius(&self) -> Option<f64> {
        match self.kind {
            SegmentKind::Coniferous { foliage_radius } => Some(foliage_radius),
            SegmentKind::Broadleaved { .. } => None,
        }
    }
}

/// Morphology specific segment data
#[derive(Debug, Clone)]
pub enum SegmentKind {
    /// Broadleaved segment
    Broadleaved {
        /// Leaves attached to the segment
        leaves: Vec<BroadLeaf>,
    },
    /// Coniferous segment
    Coniferous {
        /// Radius to the foliage limit
        foliage_radius: f64,
    },
}

/// Broad leaf
#[derive(Debug, Clone)]
pub struct BroadLeaf {
    /// Leaf shape
    pub shape: KiteShape,
    /// Leaf area
    pub area: f64,
    /// Incoming radiation
    pub qin: f64,
    /// Absorbed radiation
    pub qabs: f64,
    /// Photosynthesis
    pub photosynthesis: f64,
    /// Petiole
    pub petiole: Petiole,
}

/// Kite shaped leaf blade
#[derive(Debug, Clone, PartialEq)]
pub struct KiteShape {
    /// Base corner, where the petiole attaches
    pub base: Point,
    /// Right corner
    pub right: Point,
    /// Apex corner
    pub apex: Point,
    /// Left corner
    pub left: Point,
}

impl KiteShape {
    /// Perimeter points in counterclockwise order: base, right, apex, left
    pub fn vertices(&self) -> Vec<Point> {
        vec![self.base, self.right, self.apex, self.left]
    }
}

/// Leaf petiole
#[derive(Debug, Clone, PartialEq)]
pub struct Petiole {
    /// Start point on the segment
    pub start: Point,
    /// End point, the leaf base
    pub end: Point,
}
