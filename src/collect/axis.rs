//! Axis records
use crate::traits::CompartmentVisitor;
use crate::tree::{Bud, TreeSegment};
use crate::types::{
    Point, MIN_SEGMENT_RADIUS, TREE_HWSEGMENT_BLOCK, TREE_SEGMENT_BLOCK,
    TREE_SEGMENT_FOLIAGE_BLOCK, TUBE_FOLIAGE_RADIUS_SCALAR, TUBE_HW_RADIUS_SCALAR,
    TUBE_RADIUS_SCALAR,
};
use itertools::izip;
use log::warn;

/// Radius field used as the tube radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadiusField {
    /// Segment radius
    Radius,
    /// Heartwood radius
    HeartwoodRadius,
    /// Radius to the foliage limit
    FoliageRadius,
}

impl RadiusField {
    /// Name of the scalar array holding the radius
    pub fn scalar_name(&self) -> &'static str {
        match self {
            Self::Radius => TUBE_RADIUS_SCALAR,
            Self::HeartwoodRadius => TUBE_HW_RADIUS_SCALAR,
            Self::FoliageRadius => TUBE_FOLIAGE_RADIUS_SCALAR,
        }
    }

    /// Name of the block the tubes of this field are stored in
    pub fn block_name(&self) -> &'static str {
        match self {
            Self::Radius => TREE_SEGMENT_BLOCK,
            Self::HeartwoodRadius => TREE_HWSEGMENT_BLOCK,
            Self::FoliageRadius => TREE_SEGMENT_FOLIAGE_BLOCK,
        }
    }
}

/// Data collected from the segments of one axis.
///
/// All vectors have the same length. Entries run from the base of the axis to its tip; the
/// last entry is the bud, carrying the values of the segment just below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisRecord {
    /// Segment base points, bud point last
    pub points: Vec<Point>,
    /// Segment lengths
    pub lengths: Vec<f64>,
    /// Segment radii
    pub radii: Vec<f64>,
    /// Segment heartwood radii
    pub heartwood_radii: Vec<f64>,
    /// Segment radii to the foliage limit
    pub foliage_radii: Vec<f64>,
    /// Foliage masses
    pub foliage_masses: Vec<f64>,
    /// Incoming radiation
    pub qin: Vec<f64>,
    /// Absorbed radiation
    pub qabs: Vec<f64>,
    /// Photosynthesis
    pub photosynthesis: Vec<f64>,
    /// Scalar name tag of each entry
    pub scalar_names: Vec<&'static str>,
    /// Sum of the segment lengths
    pub total_length: f64,
}

/// One entry of an [AxisRecord]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisEntry {
    /// Point
    pub point: Point,
    /// Segment length
    pub length: f64,
    /// Segment radius
    pub radius: f64,
    /// Heartwood radius
    pub heartwood_radius: f64,
    /// Radius to the foliage limit
    pub foliage_radius: f64,
    /// Foliage mass
    pub foliage_mass: f64,
    /// Incoming radiation
    pub qin: f64,
    /// Absorbed radiation
    pub qabs: f64,
    /// Photosynthesis
    pub photosynthesis: f64,
}

impl AxisEntry {
    fn bud(bud: &Bud) -> Self {
        Self {
            point: bud.point,
            length: 0.0,
            radius: MIN_SEGMENT_RADIUS,
            heartwood_radius: MIN_SEGMENT_RADIUS,
            foliage_radius: MIN_SEGMENT_RADIUS,
            foliage_mass: 0.0,
            qin: 0.0,
            qabs: 0.0,
            photosynthesis: 0.0,
        }
    }

    fn segment(segment: &TreeSegment) -> Self {
        Self {
            point: segment.point,
            length: segment.length,
            radius: segment.radius,
            heartwood_radius: segment.heartwood_radius,
            foliage_radius: segment.foliage_radius().unwrap_or(0.0),
            foliage_mass: segment.foliage_mass,
            qin: segment.qin,
            qabs: segment.qabs,
            photosynthesis: segment.photosynthesis,
        }
    }
}

impl AxisRecord {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Is the record empty?
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Do all parallel vectors have the same length?
    pub fn is_aligned(&self) -> bool {
        let n = self.points.len();
        [
            self.lengths.len(),
            self.radii.len(),
            self.heartwood_radii.len(),
            self.foliage_radii.len(),
            self.foliage_masses.len(),
            self.qin.len(),
            self.qabs.len(),
            self.photosynthesis.len(),
            self.scalar_names.len(),
        ]
        .iter()
        .all(|len| *len == n)
    }

    /// Values of a radius field
    pub fn radius_field(&self, field: RadiusField) -> &[f64] {
        match field {
            RadiusField::Radius => &self.radii,
            RadiusField::HeartwoodRadius => &self.heartwood_radii,
            RadiusField::FoliageRadius => &self.foliage_radii,
        }
    }

    /// The entry at `index`
    pub fn entry(&self, index: usize) -> Option<AxisEntry> {
        self.entries().nth(index)
    }

    /// Iterate over the entries
    pub fn entries(&self) -> impl Iterator<Item = AxisEntry> + '_ {
        izip!(
            &self.points,
            &self.lengths,
            &self.radii,
            &self.heartwood_radii,
            &self.foliage_radii,
            &self.foliage_masses,
            &self.qin,
            &self.qabs,
            &self.photosynthesis
        )
        .map(|(point, length, radius, rh, rf, wf, qin, qabs, p)| AxisEntry {
            point: *point,
            length: *length,
            radius: *radius,
            heartwood_radius: *rh,
            foliage_radius: *rf,
            foliage_mass: *wf,
            qin: *qin,
            qabs: *qabs,
            photosynthesis: *p,
        })
    }

    fn push(&mut self, entry: AxisEntry) {
        self.points.push(entry.point);
        self.lengths.push(entry.length);
        self.radii.push(entry.radius);
        self.heartwood_radii.push(entry.heartwood_radius);
        self.foliage_radii.push(entry.foliage_radius);
        self.foliage_masses.push(entry.foliage_mass);
        self.qin.push(entry.qin);
        self.qabs.push(entry.qabs);
        self.photosynthesis.push(entry.photosynthesis);
        self.scalar_names.push(TUBE_RADIUS_SCALAR);
    }

    fn reverse(&mut self) {
        self.points.reverse();
        self.lengths.reverse();
        self.radii.reverse();
        self.heartwood_radii.reverse();
        self.foliage_radii.reverse();
        self.foliage_masses.reverse();
        self.qin.reverse();
        self.qabs.reverse();
        self.photosynthesis.reverse();
        self.scalar_names.reverse();
    }
}

/// State of the bud entry of an axis being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BudEntry {
    /// Placeholder values from the bud
    Pending,
    /// Values of the mother segment of the bud
    Committed,
}

/// Record of one axis being walked from the tip down.
///
/// Entries are appended tip first and reversed once when the axis is finished.
#[derive(Debug)]
struct AxisRecordBuilder {
    record: AxisRecord,
    bud_entry: BudEntry,
}

impl AxisRecordBuilder {
    /// Open a record with the placeholder entry of `bud`
    fn open(bud: &Bud) -> Self {
        let mut record = AxisRecord::default();
        record.push(AxisEntry::bud(bud));
        Self {
            record,
            bud_entry: BudEntry::Pending,
        }
    }

    fn add_segment(&mut self, segment: &TreeSegment) {
        if self.bud_entry == BudEntry::Pending {
            // The first segment below the bud is its mother segment
            let r = &mut self.record;
            r.lengths[0] = segment.length;
            r.radii[0] = segment.radius;
            r.heartwood_radii[0] = segment.heartwood_radius;
            if let Some(rf) = segment.foliage_radius() {
                r.foliage_radii[0] = rf;
            }
            r.foliage_masses[0] = segment.foliage_mass;
            r.qin[0] = segment.qin;
            r.qabs[0] = segment.qabs;
            r.photosynthesis[0] = segment.photosynthesis;
            self.bud_entry = BudEntry::Committed;
        }
        self.record.total_length += segment.length;
        self.record.push(AxisEntry::segment(segment));
    }

    fn finish(mut self) -> AxisRecord {
        self.record.reverse();
        self.record
    }
}

#[derive(Debug, Default)]
struct OpenAxis {
    builder: Option<AxisRecordBuilder>,
    branches: Vec<AxisRecord>,
    segments_without_bud: usize,
}

/// Collect one [AxisRecord] per axis.
///
/// The record of an axis comes before the records of its branches. Branches are ordered by
/// the position of their branching point from the tip down, and by storage order at one
/// branching point.
#[derive(Debug, Default)]
pub struct AxisCollector {
    open: Vec<OpenAxis>,
    records: Vec<AxisRecord>,
}

impl AxisCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected records
    pub fn into_records(self) -> Vec<AxisRecord> {
        self.records
    }
}

impl CompartmentVisitor for AxisCollector {
    fn begin_axis(&mut self) {
        self.open.push(OpenAxis::default());
    }

    fn visit_bud(&mut self, bud: &Bud) {
        if let Some(axis) = self.open.last_mut() {
            if axis.builder.is_some() {
                warn!("Axis with more than one bud, ignoring bud at {}", bud.point);
            } else {
                axis.builder = Some(AxisRecordBuilder::open(bud));
            }
        }
    }

    fn visit_segment(&mut self, segment: &TreeSegment) {
        if let Some(axis) = self.open.last_mut() {
            match axis.builder.as_mut() {
                Some(builder) => builder.add_segment(segment),
                None => axis.segments_without_bud += 1,
            }
        }
    }

    fn end_axis(&mut self) {
        let Some(axis) = self.open.pop() else {
            return;
        };
        if axis.segments_without_bud > 0 {
            warn!(
                "Skipping {} segments of an axis without terminating bud",
                axis.segments_without_bud
            );
        }
        let records = axis
            .builder
            .map(AxisRecordBuilder::finish)
            .into_iter()
            .chain(axis.branches);
        match self.open.last_mut() {
            Some(parent) => parent.branches.extend(records),
            None => self.records.extend(records),
        }
    }
}
