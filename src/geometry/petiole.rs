//! Petiole assembly
use super::polydata::{PolyData, ScalarArray};
use crate::collect::PetioleRecord;
use crate::types::{Error, Result, LEAF_COLOR, LINE_WIDTH, LINE_WIDTH_SCALAR};

/// Assemble the line of a petiole with one width per end point
pub fn assemble_petiole(record: &PetioleRecord) -> Result<PolyData> {
    let [start, end] = record.points[..] else {
        return Err(Error::MalformedOrgan {
            organ: "petiole",
            expected: 2,
            found: record.points.len(),
        });
    };
    if record.widths.len() != 2 {
        return Err(Error::MalformedOrgan {
            organ: "petiole",
            expected: 2,
            found: record.widths.len(),
        });
    }
    let mut petiole = PolyData::from_points(vec![start, end]);
    petiole.add_line(vec![0, 1]);
    petiole.add_point_data(ScalarArray::new(LINE_WIDTH_SCALAR, record.widths.clone()));
    petiole.set_active_scalars(LINE_WIDTH_SCALAR);
    petiole.set_color(LEAF_COLOR);
    petiole.set_line_width(LINE_WIDTH);
    Ok(petiole)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Point;

    #[test]
    fn test_petiole() {
        let record = PetioleRecord {
            points: vec![Point::origin(), Point::new(0.1, 0.0, 0.0)],
            widths: vec![1.0, 1.0],
            scalar_names: vec![LINE_WIDTH_SCALAR; 2],
        };
        let petiole = assemble_petiole(&record).unwrap();
        assert_eq!(petiole.points(), &record.points[..]);
        assert_eq!(petiole.lines(), &[vec![0, 1]]);
        assert_eq!(
            petiole.point_array("PetioleWidth").unwrap().values,
            vec![1.0, 1.0]
        );
        assert_eq!(petiole.hints().line_width, Some(1.0));
        assert!(petiole.is_consistent());
    }

    #[test]
    fn test_malformed_petiole() {
        for n in [0, 1, 3] {
            let record = PetioleRecord {
                points: vec![Point::origin(); n],
                widths: vec![1.0; n],
                scalar_names: vec![LINE_WIDTH_SCALAR; n],
            };
            assert!(matches!(
                assemble_petiole(&record),
                Err(Error::MalformedOrgan {
                    organ: "petiole",
                    expected: 2,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_petiole_widths() {
        for n in [0, 1, 3] {
            let record = PetioleRecord {
                points: vec![Point::origin(), Point::new(0.0, 0.1, 0.0)],
                widths: vec![LINE_WIDTH; n],
                scalar_names: vec![LINE_WIDTH_SCALAR; 2],
            };
            assert!(matches!(
                assemble_petiole(&record),
                Err(Error::MalformedOrgan {
                    organ: "petiole",
                    expected: 2,
                    found,
                }) if found == n
            ));
        }
    }
}
