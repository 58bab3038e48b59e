//! General type definitions and constants
use nalgebra::Point3;

/// Point type used for all tree and geometry coordinates
pub type Point = Point3<f64>;

/// Technical minimum segment radius for visualisation.
///
/// Used for the bud end of an axis so that the tube never degenerates to zero radius.
pub const MIN_SEGMENT_RADIUS: f64 = 1e-05;

/// Petiole line width (in pixels). For VTK the minimum value is 1.
pub const LINE_WIDTH: f64 = 1.0;

/// Number of sides of the tube cross section
pub const TUBE_NUMBER_OF_SIDES: usize = 30;

/// Default number of spline samples per axis point
pub const SPLINE_RESOLUTION: usize = 10;

/// Segment radius as tube radius scalar
pub const TUBE_RADIUS_SCALAR: &str = "LGAR";
/// Segment heartwood radius as tube radius scalar
pub const TUBE_HW_RADIUS_SCALAR: &str = "LGARh";
/// Segment radius to the foliage limit as tube radius scalar
pub const TUBE_FOLIAGE_RADIUS_SCALAR: &str = "LGARf";
/// Foliage mass scalar
pub const FOLIAGE_MASS_SCALAR: &str = "LGAWf";
/// Leaf area scalar
pub const LEAF_AREA_SCALAR: &str = "LGAA";
/// Incoming radiation scalar
pub const QIN_SCALAR: &str = "LGAQin";
/// Absorbed radiation scalar
pub const QABS_SCALAR: &str = "LGAQabs";
/// Photosynthesis scalar
pub const PHOTOSYNTHESIS_SCALAR: &str = "LGAP";
/// Petiole line width scalar
pub const LINE_WIDTH_SCALAR: &str = "PetioleWidth";

/// Block name for tree segment tubes
pub const TREE_SEGMENT_BLOCK: &str = "TreeSegmentBlock";
/// Block name for tree segment heartwood tubes
pub const TREE_HWSEGMENT_BLOCK: &str = "TreeHwSegmentBlock";
/// Block name for tree segment foliage tubes
pub const TREE_SEGMENT_FOLIAGE_BLOCK: &str = "TreeSegmentFoliageBlock";
/// Block name for leaves
pub const LEAF_BLOCK: &str = "LeafBlock";
/// Block name for petioles
pub const PETIOLE_BLOCK: &str = "PetioleBlock";

/// Tube colour
pub const TUBE_COLOR: &str = "sandy_brown";
/// Leaf and petiole colour
pub const LEAF_COLOR: &str = "green";

/// Root group of the serialized trees in a container
pub const TREE_XML_GROUP: &str = "/TreeXML/";

/// Partitioned dataset collection file extension
pub const VTPC_EXTENSION: &str = "vtpc";
/// Multiblock dataset file extension
pub const VTM_EXTENSION: &str = "vtm";

/// Conversion error
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Missing, ambiguous or unsupported input or output selection
    #[error("Input selection error: {0}")]
    InputSelection(String),
    /// A container query returned no datasets
    #[error("Not found: {0}")]
    NotFound(String),
    /// Tree or leaf type that cannot be converted
    #[error("Unsupported morphology: {0}")]
    UnsupportedMorphology(String),
    /// Organ record with the wrong number of points or scalar values
    #[error("Malformed {organ}: expected {expected} entries, found {found}")]
    MalformedOrgan {
        /// Organ kind
        organ: &'static str,
        /// Required number of entries
        expected: usize,
        /// Number of entries in the record
        found: usize,
    },
    /// Storage open, read, parse or write failure
    #[error("{context}: {reason}")]
    ContainerIo {
        /// File or dataset the failure refers to
        context: String,
        /// Underlying cause
        reason: String,
    },
}

impl Error {
    /// Create a storage error for `context`
    pub fn container_io(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::ContainerIo {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
