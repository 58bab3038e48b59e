//! Leaf and petiole records
use crate::traits::CompartmentVisitor;
use crate::tree::{BroadLeaf, TreeSegment};
use crate::types::{Point, LEAF_AREA_SCALAR, LINE_WIDTH, LINE_WIDTH_SCALAR};

/// Data collected from one kite leaf.
///
/// The scalar values are replicated once per perimeter point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafRecord {
    /// Perimeter points: base, right, apex, left
    pub points: Vec<Point>,
    /// Leaf area
    pub areas: Vec<f64>,
    /// Incoming radiation
    pub qin: Vec<f64>,
    /// Absorbed radiation
    pub qabs: Vec<f64>,
    /// Photosynthesis
    pub photosynthesis: Vec<f64>,
    /// Scalar name tag of each point
    pub scalar_names: Vec<&'static str>,
}

impl LeafRecord {
    /// Create the record of `leaf`
    pub fn new(leaf: &BroadLeaf) -> Self {
        let points = leaf.shape.vertices();
        let n = points.len();
        Self {
            points,
            areas: vec![leaf.area; n],
            qin: vec![leaf.qin; n],
            qabs: vec![leaf.qabs; n],
            photosynthesis: vec![leaf.photosynthesis; n],
            scalar_names: vec![LEAF_AREA_SCALAR; n],
        }
    }
}

/// Data collected from one petiole
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetioleRecord {
    /// Start and end point
    pub points: Vec<Point>,
    /// Line width at each point
    pub widths: Vec<f64>,
    /// Scalar name tag of each point
    pub scalar_names: Vec<&'static str>,
}

impl PetioleRecord {
    /// Create the petiole record of `leaf`
    pub fn new(leaf: &BroadLeaf) -> Self {
        Self {
            points: vec![leaf.petiole.start, leaf.petiole.end],
            widths: vec![LINE_WIDTH; 2],
            scalar_names: vec![LINE_WIDTH_SCALAR; 2],
        }
    }
}

/// Collect one [LeafRecord] per leaf
#[derive(Debug, Default)]
pub struct LeafCollector {
    records: Vec<LeafRecord>,
}

impl LeafCollector {
    /// The collected records
    pub fn into_records(self) -> Vec<LeafRecord> {
        self.records
    }
}

impl CompartmentVisitor for LeafCollector {
    fn visit_segment(&mut self, segment: &TreeSegment) {
        self.records
            .extend(segment.leaves().iter().map(LeafRecord::new));
    }
}

/// Collect one [PetioleRecord] per leaf
#[derive(Debug, Default)]
pub struct PetioleCollector {
    records: Vec<PetioleRecord>,
}

impl PetioleCollector {
    /// The collected records
    pub fn into_records(self) -> Vec<PetioleRecord> {
        self.records
    }
}

impl CompartmentVisitor for PetioleCollector {
    fn visit_segment(&mut self, segment: &TreeSegment) {
        self.records
            .extend(segment.leaves().iter().map(PetioleRecord::new));
    }
}
