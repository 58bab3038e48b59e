//! Polygonal data primitive
use crate::types::Point;

/// Named scalar array with one component per tuple
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarArray {
    /// Array name
    pub name: String,
    /// Values
    pub values: Vec<f64>,
}

impl ScalarArray {
    /// Create a scalar array
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Is the array empty?
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Display properties of a primitive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderHints {
    /// Named colour
    pub color: Option<&'static str>,
    /// Line width in pixels
    pub line_width: Option<f64>,
    /// Colour by the active scalars
    pub scalar_visibility: bool,
}

/// Points and cells with attached scalar arrays.
///
/// Cells are ordered as in VTK: lines, then polygons, then triangle strips. Cell data arrays
/// have one value per cell in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyData {
    points: Vec<Point>,
    lines: Vec<Vec<usize>>,
    polys: Vec<Vec<usize>>,
    strips: Vec<Vec<usize>>,
    point_data: Vec<ScalarArray>,
    cell_data: Vec<ScalarArray>,
    active_scalars: Option<String>,
    hints: RenderHints,
}

impl PolyData {
    /// Create an empty primitive
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a primitive from its points
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Points
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points
    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    /// Number of cells of all kinds
    pub fn number_of_cells(&self) -> usize {
        self.lines.len() + self.polys.len() + self.strips.len()
    }

    /// Add a point and return its index
    pub fn add_point(&mut self, point: Point) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    /// Polylines
    pub fn lines(&self) -> &[Vec<usize>] {
        &self.lines
    }

    /// Polygons
    pub fn polys(&self) -> &[Vec<usize>] {
        &self.polys
    }

    /// Triangle strips
    pub fn strips(&self) -> &[Vec<usize>] {
        &self.strips
    }

    /// Add a polyline
    pub fn add_line(&mut self, cell: Vec<usize>) {
        self.lines.push(cell);
    }

    /// Add a polygon
    pub fn add_poly(&mut self, cell: Vec<usize>) {
        self.polys.push(cell);
    }

    /// Add a triangle strip
    pub fn add_strip(&mut self, cell: Vec<usize>) {
        self.strips.push(cell);
    }

    /// Point data arrays
    pub fn point_data(&self) -> &[ScalarArray] {
        &self.point_data
    }

    /// Cell data arrays
    pub fn cell_data(&self) -> &[ScalarArray] {
        &self.cell_data
    }

    /// Point data array called `name`
    pub fn point_array(&self, name: &str) -> Option<&ScalarArray> {
        self.point_data.iter().find(|a| a.name == name)
    }

    /// Cell data array called `name`
    pub fn cell_array(&self, name: &str) -> Option<&ScalarArray> {
        self.cell_data.iter().find(|a| a.name == name)
    }

    /// Attach a point data array
    pub fn add_point_data(&mut self, array: ScalarArray) {
        self.point_data.push(array);
    }

    /// Attach a cell data array
    pub fn add_cell_data(&mut self, array: ScalarArray) {
        self.cell_data.push(array);
    }

    /// Name of the active scalars
    pub fn active_scalars(&self) -> Option<&str> {
        self.active_scalars.as_deref()
    }

    /// Set the active scalars
    pub fn set_active_scalars(&mut self, name: impl Into<String>) {
        self.active_scalars = Some(name.into());
    }

    /// Display properties
    pub fn hints(&self) -> &RenderHints {
        &self.hints
    }

    /// Set the colour
    pub fn set_color(&mut self, color: &'static str) {
        self.hints.color = Some(color);
    }

    /// Set the line width
    pub fn set_line_width(&mut self, width: f64) {
        self.hints.line_width = Some(width);
    }

    /// Colour the primitive by its active scalars
    pub fn set_scalar_visibility(&mut self, visible: bool) {
        self.hints.scalar_visibility = visible;
    }

    /// Check that every cell refers to existing points and every array matches its tuple count
    pub fn is_consistent(&self) -> bool {
        let npts = self.points.len();
        let ncells = self.number_of_cells();
        self.lines
            .iter()
            .chain(&self.polys)
            .chain(&self.strips)
            .flatten()
            .all(|i| *i < npts)
            && self.point_data.iter().all(|a| a.len() == npts)
            && self.cell_data.iter().all(|a| a.len() == ncells)
    }
}
