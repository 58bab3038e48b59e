//! Leaf assembly
use super::polydata::{PolyData, ScalarArray};
use crate::collect::LeafRecord;
use crate::types::{
    Error, Result, LEAF_AREA_SCALAR, LEAF_COLOR, PHOTOSYNTHESIS_SCALAR, QABS_SCALAR, QIN_SCALAR,
};

/// Assemble the two triangles of a kite leaf.
///
/// The perimeter points `[base, right, apex, left]` are reordered to
/// `[base, left, right, apex]`, which gives the triangles `(base, left, right)` and
/// `(left, right, apex)` sharing the left-right diagonal. Every scalar array of the record
/// must hold one value per perimeter point.
pub fn assemble_leaf(record: &LeafRecord) -> Result<PolyData> {
    let [base, right, apex, left] = record.points[..] else {
        return Err(Error::MalformedOrgan {
            organ: "leaf",
            expected: 4,
            found: record.points.len(),
        });
    };
    let mut leaf = PolyData::from_points(vec![base, left, right, apex]);
    leaf.add_poly(vec![0, 1, 2]);
    leaf.add_poly(vec![1, 2, 3]);

    let ncells = leaf.number_of_cells();
    for (name, values) in [
        (LEAF_AREA_SCALAR, &record.areas),
        (QIN_SCALAR, &record.qin),
        (QABS_SCALAR, &record.qabs),
        (PHOTOSYNTHESIS_SCALAR, &record.photosynthesis),
    ] {
        if values.len() != record.points.len() {
            return Err(Error::MalformedOrgan {
                organ: "leaf",
                expected: record.points.len(),
                found: values.len(),
            });
        }
        let value = values[0];
        leaf.add_cell_data(ScalarArray::new(name, vec![value; ncells]));
    }
    leaf.set_active_scalars(LEAF_AREA_SCALAR);
    leaf.set_color(LEAF_COLOR);
    Ok(leaf)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Point;

    fn record(points: Vec<Point>) -> LeafRecord {
        let n = points.len();
        LeafRecord {
            points,
            areas: vec![0.5; n],
            qin: vec![1.0; n],
            qabs: vec![0.25; n],
            photosynthesis: vec![0.125; n],
            scalar_names: vec![LEAF_AREA_SCALAR; n],
        }
    }

    fn kite() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.5, 0.5, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(-0.5, 0.5, 0.0),
        ]
    }

    #[test]
    fn test_leaf_winding() {
        let k = kite();
        let leaf = assemble_leaf(&record(k.clone())).unwrap();
        assert_eq!(leaf.points(), &[k[0], k[3], k[1], k[2]]);
        assert_eq!(leaf.polys(), &[vec![0, 1, 2], vec![1, 2, 3]]);
        assert!(leaf.strips().is_empty());
        assert!(leaf.is_consistent());
    }

    #[test]
    fn test_leaf_cell_data() {
        let leaf = assemble_leaf(&record(kite())).unwrap();
        assert_eq!(leaf.cell_data().len(), 4);
        assert_eq!(leaf.cell_array("LGAA").unwrap().values, vec![0.5, 0.5]);
        assert_eq!(leaf.cell_array("LGAQin").unwrap().values, vec![1.0, 1.0]);
        assert_eq!(leaf.cell_array("LGAQabs").unwrap().values, vec![0.25, 0.25]);
        assert_eq!(leaf.cell_array("LGAP").unwrap().values, vec![0.125, 0.125]);
        assert_eq!(leaf.active_scalars(), Some("LGAA"));
        assert_eq!(leaf.hints().color, Some("green"));
    }

    #[test]
    fn test_malformed_leaf() {
        for n in [0, 3, 5] {
            let points = vec![Point::origin(); n];
            assert!(matches!(
                assemble_leaf(&record(points)),
                Err(Error::MalformedOrgan {
                    organ: "leaf",
                    expected: 4,
                    found,
                }) if found == n
            ));
        }
    }

    #[test]
    fn test_leaf_missing_values() {
        let mut r = record(kite());
        r.qabs.clear();
        assert!(matches!(
            assemble_leaf(&r),
            Err(Error::MalformedOrgan {
                organ: "leaf",
                expected: 4,
                found: 0,
            })
        ));

        let mut r = record(kite());
        r.areas.pop();
        assert!(matches!(
            assemble_leaf(&r),
            Err(Error::MalformedOrgan {
                organ: "leaf",
                expected: 4,
                found: 3,
            })
        ));
    }
}
