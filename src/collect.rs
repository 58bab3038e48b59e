//! Data collection from trees
//!
//! The collectors walk a tree with [Tree::walk_down] and produce flat records that the
//! geometry assemblers turn into VTK primitives: one [AxisRecord] per axis, and one
//! [LeafRecord] and one [PetioleRecord] per leaf.
mod axis;
mod organ;

pub use axis::{AxisCollector, AxisEntry, AxisRecord, RadiusField};
pub use organ::{LeafCollector, LeafRecord, PetioleCollector, PetioleRecord};

use crate::traits::CompartmentVisitor;
use crate::tree::{Bud, Tree, TreeSegment};

/// All records collected from one tree
#[derive(Debug, Clone, Default)]
pub struct TreeData {
    /// One record per axis
    pub axes: Vec<AxisRecord>,
    /// One record per leaf
    pub leaves: Vec<LeafRecord>,
    /// One record per petiole
    pub petioles: Vec<PetioleRecord>,
}

/// Collect axis, leaf and petiole records in a single walk
#[derive(Debug, Default)]
pub struct TreeDataCollector {
    axes: AxisCollector,
    leaves: LeafCollector,
    petioles: PetioleCollector,
}

impl TreeDataCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish the collection
    pub fn into_data(self) -> TreeData {
        TreeData {
            axes: self.axes.into_records(),
            leaves: self.leaves.into_records(),
            petioles: self.petioles.into_records(),
        }
    }
}

impl CompartmentVisitor for TreeDataCollector {
    fn begin_axis(&mut self) {
        self.axes.begin_axis();
    }

    fn visit_bud(&mut self, bud: &Bud) {
        self.axes.visit_bud(bud);
    }

    fn visit_segment(&mut self, segment: &TreeSegment) {
        self.axes.visit_segment(segment);
        self.leaves.visit_segment(segment);
        self.petioles.visit_segment(segment);
    }

    fn end_axis(&mut self) {
        self.axes.end_axis();
    }
}

/// Collect axis, leaf and petiole records from `tree`
pub fn collect_tree_data(tree: &Tree) -> TreeData {
    let mut collector = TreeDataCollector::new();
    tree.walk_down(&mut collector);
    collector.into_data()
}

/// Collect one record per axis from `tree`
pub fn collect_axes(tree: &Tree) -> Vec<AxisRecord> {
    let mut collector = AxisCollector::default();
    tree.walk_down(&mut collector);
    collector.into_records()
}

/// Collect one record per leaf from `tree`
pub fn collect_leaves(tree: &Tree) -> Vec<LeafRecord> {
    let mut collector = LeafCollector::default();
    tree.walk_down(&mut collector);
    collector.into_records()
}

/// Collect one record per petiole from `tree`
pub fn collect_petioles(tree: &Tree) -> Vec<PetioleRecord> {
    let mut collector = PetioleCollector::default();
    tree.walk_down(&mut collector);
    collector.into_records()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree::{
        Axis, BranchingPoint, BroadLeaf, Compartment, KiteShape, Morphology, Petiole,
        SegmentKind,
    };
    use crate::types::{Point, MIN_SEGMENT_RADIUS};
    use nalgebra::Vector3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn leaf(z: f64) -> BroadLeaf {
        BroadLeaf {
            shape: KiteShape {
                base: Point::new(0.1, 0.0, z),
                right: Point::new(0.2, -0.05, z),
                apex: Point::new(0.3, 0.0, z),
                left: Point::new(0.2, 0.05, z),
            },
            area: 0.01,
            qin: 1.0,
            qabs: 0.5,
            photosynthesis: 0.1,
            petiole: Petiole {
                start: Point::new(0.0, 0.0, z),
                end: Point::new(0.1, 0.0, z),
            },
        }
    }

    fn segment(rng: &mut StdRng, z: f64, morphology: Morphology) -> TreeSegment {
        let kind = match morphology {
            Morphology::Coniferous => SegmentKind::Coniferous {
                foliage_radius: rng.gen_range(0.1..0.5),
            },
            Morphology::Broadleaved => SegmentKind::Broadleaved {
                leaves: (0..rng.gen_range(0..3)).map(|_| leaf(z)).collect(),
            },
        };
        TreeSegment {
            point: Point::new(0.0, 0.0, z),
            direction: Vector3::z(),
            length: rng.gen_range(0.1..1.0),
            radius: rng.gen_range(0.01..0.1),
            heartwood_radius: rng.gen_range(0.0..0.01),
            foliage_mass: rng.gen_range(0.0..1.0),
            qin: rng.gen(),
            qabs: rng.gen(),
            photosynthesis: rng.gen(),
            kind,
        }
    }

    /// A random axis, pushing the number of segments of each generated axis in walk order
    fn random_axis(
        rng: &mut StdRng,
        depth: usize,
        morphology: Morphology,
        sizes: &mut Vec<usize>,
    ) -> Axis {
        let nsegments = rng.gen_range(0..5);
        sizes.push(nsegments);
        let mut compartments = vec![];
        let mut z = 0.0;
        for _ in 0..nsegments {
            compartments.push(Compartment::Segment(segment(rng, z, morphology)));
            z += 1.0;
        }
        compartments.push(Compartment::Bud(Bud {
            point: Point::new(0.0, 0.0, z),
            direction: Vector3::z(),
        }));
        // Branching points are inserted tip first so child axes are generated in walk order
        if depth > 0 {
            for position in (0..nsegments).rev() {
                if rng.gen_bool(0.5) {
                    let axes = (0..rng.gen_range(1..3))
                        .map(|_| random_axis(rng, depth - 1, morphology, sizes))
                        .collect();
                    compartments.insert(
                        position + 1,
                        Compartment::BranchingPoint(BranchingPoint {
                            point: Point::new(0.0, 0.0, position as f64 + 1.0),
                            direction: Vector3::x(),
                            axes,
                        }),
                    );
                }
            }
        }
        Axis { compartments }
    }

    #[test]
    fn test_one_record_per_axis() {
        let mut rng = StdRng::seed_from_u64(0);
        for morphology in [Morphology::Coniferous, Morphology::Broadleaved] {
            for _ in 0..20 {
                let mut sizes = vec![];
                let tree = Tree::new(morphology, random_axis(&mut rng, 3, morphology, &mut sizes));
                let records = collect_axes(&tree);
                assert_eq!(records.len(), tree.axis_count());
                assert_eq!(records.len(), sizes.len());
                for (record, nsegments) in records.iter().zip(&sizes) {
                    assert!(record.is_aligned());
                    assert_eq!(record.len(), nsegments + 1);
                    let total = record.lengths[..record.len() - 1].iter().sum::<f64>();
                    approx::assert_relative_eq!(record.total_length, total, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_bud_entry_copies_mother_segment() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sizes = vec![];
        let tree = Tree::new(
            Morphology::Coniferous,
            random_axis(&mut rng, 2, Morphology::Coniferous, &mut sizes),
        );
        for record in collect_axes(&tree) {
            let n = record.len();
            let bud = record.entry(n - 1).unwrap();
            if n == 1 {
                assert_eq!(bud.radius, MIN_SEGMENT_RADIUS);
                assert_eq!(bud.heartwood_radius, MIN_SEGMENT_RADIUS);
                assert_eq!(bud.foliage_radius, MIN_SEGMENT_RADIUS);
                assert_eq!(bud.length, 0.0);
            } else {
                let top = record.entry(n - 2).unwrap();
                assert_eq!(bud.radius, top.radius);
                assert_eq!(bud.heartwood_radius, top.heartwood_radius);
                assert_eq!(bud.foliage_radius, top.foliage_radius);
                assert_eq!(bud.length, top.length);
                assert_eq!(bud.foliage_mass, top.foliage_mass);
                assert_eq!(bud.point.z, top.point.z + 1.0);
            }
            // Base to tip order
            assert!(record.points.windows(2).all(|w| w[0].z < w[1].z));
        }
    }

    #[test]
    fn test_broadleaved_foliage_radius() {
        let mut rng = StdRng::seed_from_u64(2);
        let axis = Axis {
            compartments: vec![
                Compartment::Segment(segment(&mut rng, 0.0, Morphology::Broadleaved)),
                Compartment::Bud(Bud {
                    point: Point::new(0.0, 0.0, 1.0),
                    direction: Vector3::z(),
                }),
            ],
        };
        let records = collect_axes(&Tree::new(Morphology::Broadleaved, axis));
        assert_eq!(records[0].foliage_radii, vec![0.0, MIN_SEGMENT_RADIUS]);
    }

    #[test]
    fn test_leaves_and_petioles() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sizes = vec![];
        let tree = Tree::new(
            Morphology::Broadleaved,
            random_axis(&mut rng, 2, Morphology::Broadleaved, &mut sizes),
        );
        let data = collect_tree_data(&tree);
        assert_eq!(data.leaves.len(), data.petioles.len());
        assert_eq!(data.leaves, collect_leaves(&tree));
        assert_eq!(data.petioles, collect_petioles(&tree));
        assert_eq!(data.axes, collect_axes(&tree));
        for leaf in &data.leaves {
            assert_eq!(leaf.points.len(), 4);
            assert_eq!(leaf.areas, vec![0.01; 4]);
            assert_eq!(leaf.points[0], Point::new(0.1, 0.0, leaf.points[0].z));
        }
        for petiole in &data.petioles {
            assert_eq!(petiole.points.len(), 2);
            assert_eq!(petiole.widths, vec![1.0, 1.0]);
        }
    }
}
