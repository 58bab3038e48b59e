//! Tube assembly for axes
use super::polydata::{PolyData, ScalarArray};
use super::spline::{centerline, step_samples};
use crate::collect::{AxisRecord, RadiusField};
use crate::types::{
    Error, Point, Result, FOLIAGE_MASS_SCALAR, SPLINE_RESOLUTION, TUBE_COLOR,
    TUBE_NUMBER_OF_SIDES,
};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Sampled centerline of an axis with its step replicated scalars
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    /// Samples
    pub points: Vec<Point>,
    /// Radius at each sample
    pub radii: ScalarArray,
    /// Foliage mass at each sample, only for the foliage radius field
    pub foliage_masses: Option<ScalarArray>,
}

/// Assembler for axis tubes
#[derive(Debug, Clone)]
pub struct TubeAssembler {
    resolution: usize,
    sides: usize,
}

impl Default for TubeAssembler {
    fn default() -> Self {
        Self {
            resolution: SPLINE_RESOLUTION,
            sides: TUBE_NUMBER_OF_SIDES,
        }
    }
}

impl TubeAssembler {
    /// Create an assembler.
    ///
    /// `resolution` is the number of centerline samples per axis point and `sides` the number
    /// of sides of the cross section. A resolution below 1 or fewer than 3 sides is an
    /// [Error::InputSelection].
    pub fn new(resolution: usize, sides: usize) -> Result<Self> {
        if resolution == 0 {
            return Err(Error::InputSelection(String::from(
                "spline resolution must be at least 1",
            )));
        }
        if sides < 3 {
            return Err(Error::InputSelection(format!(
                "a tube needs at least 3 sides, got {sides}"
            )));
        }
        Ok(Self { resolution, sides })
    }

    /// Centerline samples per axis point
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Sides of the cross section
    pub fn sides(&self) -> usize {
        self.sides
    }

    /// Sample the centerline of `record` with the radius taken from `field`
    pub fn centerline(&self, record: &AxisRecord, field: RadiusField) -> Result<Centerline> {
        if record.is_empty() {
            return Err(Error::MalformedOrgan {
                organ: "axis",
                expected: 1,
                found: 0,
            });
        }
        let radii = record.radius_field(field);
        if !record.is_aligned() {
            return Err(Error::MalformedOrgan {
                organ: "axis",
                expected: radii.len(),
                found: record.len(),
            });
        }
        let foliage_masses = (field == RadiusField::FoliageRadius).then(|| {
            ScalarArray::new(
                FOLIAGE_MASS_SCALAR,
                step_samples(&record.foliage_masses, self.resolution),
            )
        });
        Ok(Centerline {
            points: centerline(&record.points, self.resolution),
            radii: ScalarArray::new(field.scalar_name(), step_samples(radii, self.resolution)),
            foliage_masses,
        })
    }

    /// Assemble the tube of one axis
    pub fn assemble(&self, record: &AxisRecord, field: RadiusField) -> Result<PolyData> {
        let line = self.centerline(record, field)?;
        let mut tube = sweep(&line.points, &line.radii.values, self.sides);
        let replicate = |values: &[f64]| {
            values
                .iter()
                .flat_map(|v| std::iter::repeat(*v).take(self.sides))
                .collect::<Vec<_>>()
        };
        tube.add_point_data(ScalarArray::new(
            line.radii.name.clone(),
            replicate(&line.radii.values),
        ));
        if let Some(masses) = line.foliage_masses {
            tube.add_point_data(ScalarArray::new(masses.name, replicate(&masses.values)));
        }
        tube.set_active_scalars(line.radii.name);
        tube.set_color(TUBE_COLOR);
        tube.set_scalar_visibility(false);
        Ok(tube)
    }

    /// Assemble the tubes of several axes, keeping their order
    pub fn assemble_all(
        &self,
        records: &[AxisRecord],
        field: RadiusField,
        parallel: bool,
    ) -> Result<Vec<PolyData>> {
        if parallel {
            records
                .par_iter()
                .map(|record| self.assemble(record, field))
                .collect()
        } else {
            records
                .iter()
                .map(|record| self.assemble(record, field))
                .collect()
        }
    }
}

/// Unit tangents of a polyline, reusing the previous tangent where points coincide
fn tangents(points: &[Point]) -> Vec<Vector3<f64>> {
    let n = points.len();
    let mut previous = Vector3::z();
    (0..n)
        .map(|k| {
            let d = points[(k + 1).min(n - 1)] - points[k.saturating_sub(1)];
            if let Some(t) = d.try_normalize(1e-12) {
                previous = t;
            }
            previous
        })
        .collect()
}

/// A unit vector perpendicular to `t`
fn perpendicular(t: &Vector3<f64>) -> Vector3<f64> {
    let axis = if t.x.abs() <= t.y.abs() && t.x.abs() <= t.z.abs() {
        Vector3::x()
    } else if t.y.abs() <= t.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    t.cross(&axis).normalize()
}

/// Sweep a circular cross section along `points`.
///
/// Ring `k` holds points `k * sides .. (k + 1) * sides`. Each side of the tube is one
/// triangle strip, and both ends are closed by a polygon.
fn sweep(points: &[Point], radii: &[f64], sides: usize) -> PolyData {
    let mut tube = PolyData::new();
    let mut normal = None::<Vector3<f64>>;
    for ((center, radius), t) in points.iter().zip(radii).zip(tangents(points)) {
        // Parallel transport of the previous normal
        let n = normal
            .and_then(|n| (n - t * n.dot(&t)).try_normalize(1e-12))
            .unwrap_or_else(|| perpendicular(&t));
        let b = t.cross(&n);
        for i in 0..sides {
            let angle = 2.0 * PI * i as f64 / sides as f64;
            tube.add_point(center + (n * angle.cos() + b * angle.sin()) * *radius);
        }
        normal = Some(n);
    }
    let nrings = points.len();
    for i in 0..sides {
        let next = (i + 1) % sides;
        tube.add_strip(
            (0..nrings)
                .flat_map(|k| [k * sides + i, k * sides + next])
                .collect(),
        );
    }
    if nrings > 0 {
        tube.add_poly((0..sides).rev().collect());
        tube.add_poly((0..sides).map(|i| (nrings - 1) * sides + i).collect());
    }
    tube
}
