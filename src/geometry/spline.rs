//! Interpolated centerlines
//!
//! A natural cubic spline is fitted through the points of an axis, parametrised by
//! accumulated chord length.
use crate::types::Point;
use itertools::Itertools;
use nalgebra::Vector3;

/// Natural cubic spline through a sequence of points
#[derive(Debug, Clone)]
pub struct ParametricSpline {
    knots: Vec<f64>,
    points: Vec<Point>,
    second_derivatives: Vec<Vector3<f64>>,
}

impl ParametricSpline {
    /// Fit a spline through `points`.
    ///
    /// Knots are placed at the accumulated chord lengths. If two consecutive points coincide
    /// the knots are spaced uniformly instead.
    pub fn new(points: &[Point]) -> Self {
        let chords = points
            .iter()
            .tuple_windows()
            .map(|(a, b)| (b - a).norm())
            .collect::<Vec<_>>();
        let knots: Vec<f64> = if chords.iter().all(|c| *c > 0.0) {
            std::iter::once(0.0)
                .chain(chords.iter().scan(0.0, |acc, c| {
                    *acc += c;
                    Some(*acc)
                }))
                .collect()
        } else {
            (0..points.len()).map(|i| i as f64).collect()
        };
        let second_derivatives = natural_second_derivatives(&knots, points);
        Self {
            knots,
            points: points.to_vec(),
            second_derivatives,
        }
    }

    /// Parameter range
    pub fn length(&self) -> f64 {
        self.knots.last().copied().unwrap_or(0.0)
    }

    /// Evaluate the spline at parameter `t`, clamped to the parameter range
    pub fn evaluate(&self, t: f64) -> Point {
        let n = self.points.len();
        if n == 0 {
            return Point::origin();
        }
        if n == 1 {
            return self.points[0];
        }
        let t = t.clamp(0.0, self.length());
        // Index of the interval containing t
        let i = self
            .knots
            .partition_point(|k| *k <= t)
            .saturating_sub(1)
            .min(n - 2);
        let h = self.knots[i + 1] - self.knots[i];
        let a = (self.knots[i + 1] - t) / h;
        let b = (t - self.knots[i]) / h;
        let p = self.points[i].coords * a
            + self.points[i + 1].coords * b
            + (self.second_derivatives[i] * (a * a * a - a)
                + self.second_derivatives[i + 1] * (b * b * b - b))
                * (h * h / 6.0);
        Point::from(p)
    }

    /// Sample the spline at `count` uniformly spaced parameters.
    ///
    /// The first and last samples are the first and last fitted points.
    pub fn sample(&self, count: usize) -> Vec<Point> {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return vec![];
        };
        match count {
            0 => vec![],
            1 => vec![*first],
            _ => {
                let step = self.length() / (count - 1) as f64;
                let mut samples = (0..count)
                    .map(|k| self.evaluate(k as f64 * step))
                    .collect::<Vec<_>>();
                samples[0] = *first;
                samples[count - 1] = *last;
                samples
            }
        }
    }
}

/// Solve for the second derivatives of a natural cubic spline
fn natural_second_derivatives(knots: &[f64], points: &[Point]) -> Vec<Vector3<f64>> {
    let n = points.len();
    let mut m = vec![Vector3::zeros(); n];
    if n < 3 {
        return m;
    }
    let h = knots
        .iter()
        .tuple_windows()
        .map(|(a, b)| b - a)
        .collect::<Vec<_>>();
    // Thomas algorithm on the interior unknowns 1..n-1
    let mut diag = vec![0.0; n];
    let mut rhs = vec![Vector3::zeros(); n];
    for i in 1..n - 1 {
        diag[i] = 2.0 * (h[i - 1] + h[i]);
        rhs[i] = ((points[i + 1] - points[i]) / h[i] - (points[i] - points[i - 1]) / h[i - 1]) * 6.0;
    }
    for i in 2..n - 1 {
        let w = h[i - 1] / diag[i - 1];
        diag[i] -= w * h[i - 1];
        rhs[i] = rhs[i] - rhs[i - 1] * w;
    }
    m[n - 2] = rhs[n - 2] / diag[n - 2];
    for i in (1..n - 2).rev() {
        m[i] = (rhs[i] - m[i + 1] * h[i]) / diag[i];
    }
    m
}

/// Number of centerline samples for `npoints` axis points at `resolution` samples per point
pub fn sample_count(npoints: usize, resolution: usize) -> usize {
    if npoints == 0 {
        0
    } else {
        npoints * resolution + 1
    }
}

/// Sample a centerline through `points` with `resolution` samples per point
pub fn centerline(points: &[Point], resolution: usize) -> Vec<Point> {
    ParametricSpline::new(points).sample(sample_count(points.len(), resolution))
}

/// Replicate each value over the `resolution` samples that follow its point.
///
/// The final sample takes the last value.
pub fn step_samples(values: &[f64], resolution: usize) -> Vec<f64> {
    let Some(last) = values.last() else {
        return vec![];
    };
    values
        .iter()
        .flat_map(|v| std::iter::repeat(*v).take(resolution))
        .chain(std::iter::once(*last))
        .collect()
}
