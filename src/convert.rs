//! Conversion of serialized trees to partitioned dataset collections
//!
//! A conversion run detects the input format from the file extension, detects the tree
//! morphology from the serialized tree, assembles the geometry of every selected tree into
//! one [PartitionedDataSetCollection] and writes it once at the end.
use crate::collect::{collect_axes, collect_tree_data, RadiusField};
use crate::collection::PartitionedDataSetCollection;
use crate::container::DatasetSelector;
use crate::geometry::{assemble_leaf, assemble_petiole, TubeAssembler};
use crate::traits::TreeContainer;
use crate::tree::{xml, Morphology, Tree};
use crate::types::{
    Error, Result, LEAF_BLOCK, PETIOLE_BLOCK, SPLINE_RESOLUTION, TUBE_NUMBER_OF_SIDES,
};
use log::{debug, info, warn};
use std::fmt;
use std::path::Path;

/// Conversion options
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Centerline samples per axis point
    resolution: usize,
    /// Sides of the tube cross section
    tube_sides: usize,
    /// Assemble axis tubes in parallel
    parallel: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            resolution: SPLINE_RESOLUTION,
            tube_sides: TUBE_NUMBER_OF_SIDES,
            parallel: true,
        }
    }
}

impl ConversionOptions {
    /// Centerline samples per axis point
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Sides of the tube cross section
    pub fn tube_sides(&self) -> usize {
        self.tube_sides
    }

    /// Are axis tubes assembled in parallel?
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Set the number of centerline samples per axis point
    pub fn set_resolution(&mut self, resolution: usize) {
        self.resolution = resolution;
    }

    /// Set the number of sides of the tube cross section
    pub fn set_tube_sides(&mut self, sides: usize) {
        self.tube_sides = sides;
    }

    /// Assemble axis tubes in parallel or serially
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }
}

/// Input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A single serialized tree
    TreeXml,
    /// HDF5 container of serialized trees
    Hdf5,
}

impl InputFormat {
    /// Detect the format from the extension of `path`
    pub fn detect(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("xml") => Ok(Self::TreeXml),
            Some("h5") => Ok(Self::Hdf5),
            _ => Err(Error::InputSelection(format!(
                "{} has neither .xml nor .h5 extension",
                path.display()
            ))),
        }
    }
}

/// Outcome of a conversion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Trees converted
    pub trees: usize,
    /// Blocks in the collection
    pub blocks: usize,
    /// Partitions over all blocks
    pub partitions: usize,
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trees, {} blocks, {} partitions",
            self.trees, self.blocks, self.partitions
        )
    }
}

/// Accumulates the geometry of trees into one collection
#[derive(Debug, Default)]
pub struct Converter {
    options: ConversionOptions,
    assembler: TubeAssembler,
    collection: PartitionedDataSetCollection,
    trees: usize,
}

impl Converter {
    /// Create a converter, failing for tube settings [TubeAssembler::new] rejects
    pub fn new(options: ConversionOptions) -> Result<Self> {
        Ok(Self {
            assembler: TubeAssembler::new(options.resolution(), options.tube_sides())?,
            options,
            collection: PartitionedDataSetCollection::new(),
            trees: 0,
        })
    }

    /// Options
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Add the stem tubes, leaves and petioles of a broadleaved tree
    pub fn add_broadleaved_tree(&mut self, tree: &Tree) -> Result<()> {
        let data = collect_tree_data(tree);
        debug!(
            "Collected {} axes, {} leaves and {} petioles",
            data.axes.len(),
            data.leaves.len(),
            data.petioles.len()
        );
        let field = RadiusField::Radius;
        let tubes = self
            .assembler
            .assemble_all(&data.axes, field, self.options.parallel())?;
        let leaves = data
            .leaves
            .iter()
            .map(assemble_leaf)
            .collect::<Result<Vec<_>>>()?;
        let petioles = data
            .petioles
            .iter()
            .map(assemble_petiole)
            .collect::<Result<Vec<_>>>()?;

        self.collection.extend_block(field.block_name(), tubes);
        self.collection.extend_block(LEAF_BLOCK, leaves);
        self.collection.extend_block(PETIOLE_BLOCK, petioles);
        self.trees += 1;
        Ok(())
    }

    /// Add the foliage, heartwood and segment tubes of a coniferous tree
    pub fn add_coniferous_tree(&mut self, tree: &Tree) -> Result<()> {
        let axes = collect_axes(tree);
        debug!("Collected {} axes", axes.len());
        let blocks = [
            RadiusField::FoliageRadius,
            RadiusField::HeartwoodRadius,
            RadiusField::Radius,
        ]
        .into_iter()
        .map(|field| {
            self.assembler
                .assemble_all(&axes, field, self.options.parallel())
                .map(|tubes| (field.block_name(), tubes))
        })
        .collect::<Result<Vec<_>>>()?;
        for (name, tubes) in blocks {
            self.collection.extend_block(name, tubes);
        }
        self.trees += 1;
        Ok(())
    }

    /// Add a tree of either morphology
    pub fn add_tree(&mut self, tree: &Tree) -> Result<()> {
        info!("{}", tree.morphology());
        match tree.morphology() {
            Morphology::Broadleaved => self.add_broadleaved_tree(tree),
            Morphology::Coniferous => self.add_coniferous_tree(tree),
        }
    }

    /// Number of trees added
    pub fn number_of_trees(&self) -> usize {
        self.trees
    }

    /// The collection built so far
    pub fn collection(&self) -> &PartitionedDataSetCollection {
        &self.collection
    }

    /// Take the collection
    pub fn into_collection(self) -> PartitionedDataSetCollection {
        self.collection
    }

    /// Summary of the collection built so far
    pub fn summary(&self) -> ConversionSummary {
        ConversionSummary {
            trees: self.trees,
            blocks: self.collection.number_of_blocks(),
            partitions: self.collection.number_of_partitions(),
        }
    }

    /// Write the collection to `output`
    pub fn write(&self, output: &Path) -> Result<ConversionSummary> {
        self.collection.write(output)?;
        Ok(self.summary())
    }
}

/// Replace the context of storage errors with `context`
fn with_context(e: Error, context: &str) -> Error {
    match e {
        Error::ContainerIo { reason, .. } => Error::container_io(context, reason),
        other => other,
    }
}

/// Convert a single serialized tree file
pub fn convert_xml_file(
    input: &Path,
    output: &Path,
    options: &ConversionOptions,
) -> Result<ConversionSummary> {
    let mut converter = Converter::new(options.clone())?;
    info!("Reading tree: {}", input.display());
    let tree = xml::read_tree_file(input)?;
    converter.add_tree(&tree)?;
    converter.write(output)
}

/// Assemble the trees selected from `container` into one collection.
///
/// The morphology is detected from the first selected tree. Broadleaved trees are not
/// supported in containers.
pub fn convert_container_trees<C: TreeContainer + ?Sized>(
    container: &C,
    selector: &DatasetSelector,
    options: &ConversionOptions,
) -> Result<Converter> {
    let mut converter = Converter::new(options.clone())?;
    let paths = selector.select(container)?;
    let first = &paths[0];
    let info = xml::peek(&container.read_tree_string(first)?).map_err(|e| with_context(e, first))?;
    if info.segment_type == Morphology::Broadleaved.segment_type() {
        return Err(Error::UnsupportedMorphology(String::from(
            "broadleaved trees are not yet supported in tree containers",
        )));
    }
    info.morphology()?;

    for (i, path) in paths.iter().enumerate() {
        info!("Tree {i}: {path}");
        let tree = xml::read_tree(&container.read_tree_string(path)?)
            .map_err(|e| with_context(e, path))?;
        if tree.morphology() != Morphology::Coniferous {
            return Err(Error::UnsupportedMorphology(format!(
                "{path} is a {}, expected coniferous trees only",
                tree.morphology()
            )));
        }
        converter.add_coniferous_tree(&tree)?;
    }
    Ok(converter)
}

/// Convert the trees selected from `container` and write them to `output`
pub fn convert_container<C: TreeContainer + ?Sized>(
    container: &C,
    selector: &DatasetSelector,
    output: &Path,
    options: &ConversionOptions,
) -> Result<ConversionSummary> {
    let converter = convert_container_trees(container, selector, options)?;
    converter.write(output)
}

#[cfg(feature = "hdf5")]
fn open_hdf5(input: &Path) -> Result<crate::container::Hdf5TreeFile> {
    crate::container::Hdf5TreeFile::open(input)
}

#[cfg(not(feature = "hdf5"))]
fn open_hdf5(input: &Path) -> Result<crate::container::MemoryTreeContainer> {
    Err(Error::InputSelection(format!(
        "{}: HDF5 input requires the hdf5 feature",
        input.display()
    )))
}

/// Convert `input`, dispatching on its extension.
///
/// HDF5 input requires a dataset selection; it is ignored for a single tree file.
pub fn convert_file(
    input: &Path,
    selector: Option<&DatasetSelector>,
    output: &Path,
    options: &ConversionOptions,
) -> Result<ConversionSummary> {
    match InputFormat::detect(input)? {
        InputFormat::TreeXml => {
            if let Some(selector) = selector {
                warn!("Ignoring dataset selection {selector} for a single tree file");
            }
            convert_xml_file(input, output, options)
        }
        InputFormat::Hdf5 => {
            let selector = selector.ok_or_else(|| {
                Error::InputSelection(String::from(
                    "HDF5 input needs a year or a dataset selection",
                ))
            })?;
            let container = open_hdf5(input)?;
            convert_container(&container, selector, output, options)
        }
    }
}

/// Paths of all tree datasets in the container file `input`
pub fn list_file_datasets(input: &Path) -> Result<Vec<String>> {
    match InputFormat::detect(input)? {
        InputFormat::Hdf5 => crate::container::list_datasets(&open_hdf5(input)?),
        InputFormat::TreeXml => Err(Error::InputSelection(format!(
            "{} is a single tree file, datasets can only be listed in HDF5 files",
            input.display()
        ))),
    }
}
