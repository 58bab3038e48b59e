//! Writing collections to disk
//!
//! Every partition is written as a VTK XML PolyData file into a directory next to the index
//! file, named after the index file stem. The index is either a `vtkPartitionedDataSetCollection`
//! (`.vtpc`) or a `vtkMultiBlockDataSet` (`.vtm`).
use super::PartitionedDataSetCollection;
use crate::geometry::{PolyData, ScalarArray};
use crate::types::{Error, Result, VTM_EXTENSION, VTPC_EXTENSION};
use log::{info, warn};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use vtkio::model::{
    Attribute, Attributes, ByteOrder, DataArray, DataSet, ElementType, IOBuffer, Piece,
    PolyDataPiece, Version, VertexNumbers, Vtk,
};

/// Index file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionFormat {
    /// `vtkPartitionedDataSetCollection`
    PartitionedCollection,
    /// `vtkMultiBlockDataSet`
    MultiBlock,
}

impl CollectionFormat {
    /// Format from the extension of `path`, falling back to [Self::PartitionedCollection]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(VTPC_EXTENSION) => Self::PartitionedCollection,
            Some(VTM_EXTENSION) => Self::MultiBlock,
            other => {
                warn!(
                    "Output extension {:?} is not .{VTPC_EXTENSION} or .{VTM_EXTENSION}, writing a partitioned dataset collection",
                    other.unwrap_or("")
                );
                Self::PartitionedCollection
            }
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::PartitionedCollection => "vtkPartitionedDataSetCollection",
            Self::MultiBlock => "vtkMultiBlockDataSet",
        }
    }

    fn block_tag(&self) -> &'static str {
        match self {
            Self::PartitionedCollection => "Partitions",
            Self::MultiBlock => "Block",
        }
    }
}

/// Write `collection` to `path`.
///
/// Partitions and index are first written to a staging directory and a staging index next to
/// `path`. They replace the previous output only once every partition has been written. A
/// failed run removes the staged files and leaves the previous output as it was.
///
/// Returns the paths of the index file followed by the partition files.
pub fn write_collection(
    collection: &PartitionedDataSetCollection,
    path: &Path,
) -> Result<Vec<PathBuf>> {
    let format = CollectionFormat::from_path(path);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::InputSelection(format!("invalid output file {}", path.display())))?;
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let staging = Staging {
        data_dir: parent.join(format!(".{stem}.partial")),
        index: parent.join(format!(".{stem}.index.partial")),
    };

    let file_names = match staging.write(collection, format, stem) {
        Ok(file_names) => file_names,
        Err(e) => {
            staging.remove();
            return Err(e);
        }
    };

    let data_dir = parent.join(stem);
    if let Err(e) = commit(&staging, &data_dir, path) {
        staging.remove();
        return Err(e);
    }
    info!("Write file {}", path.display());
    Ok(std::iter::once(path.to_path_buf())
        .chain(file_names.iter().map(|name| data_dir.join(name)))
        .collect())
}

/// Staging locations of a collection being written
struct Staging {
    data_dir: PathBuf,
    index: PathBuf,
}

impl Staging {
    /// Write all partitions and the index, returning the partition file names
    fn write(
        &self,
        collection: &PartitionedDataSetCollection,
        format: CollectionFormat,
        stem: &str,
    ) -> Result<Vec<String>> {
        self.remove();
        fs::create_dir_all(&self.data_dir).map_err(|e| io_error(&self.data_dir, e))?;

        let mut file_names = vec![];
        let mut index = String::new();
        let io = |e: std::fmt::Error| io_error(&self.index, e);
        writeln!(index, "<?xml version=\"1.0\"?>").map_err(io)?;
        writeln!(
            index,
            "<VTKFile type=\"{}\" version=\"1.0\" byte_order=\"LittleEndian\" header_type=\"UInt64\">",
            format.type_name()
        )
        .map_err(io)?;
        writeln!(index, "  <{}>", format.type_name()).map_err(io)?;
        for (block_index, block) in collection.blocks().iter().enumerate() {
            writeln!(
                index,
                "    <{} index=\"{block_index}\" name=\"{}\">",
                format.block_tag(),
                escape(block.name())
            )
            .map_err(io)?;
            for (partition_index, partition) in block.partitions().iter().enumerate() {
                let file_name = format!("{stem}_{}_{partition_index}.vtp", block.name());
                write_polydata(partition, &self.data_dir.join(&file_name), block.name())?;
                writeln!(
                    index,
                    "      <DataSet index=\"{partition_index}\" file=\"{}\"/>",
                    escape(&format!("{stem}/{file_name}"))
                )
                .map_err(io)?;
                file_names.push(file_name);
            }
            writeln!(index, "    </{}>", format.block_tag()).map_err(io)?;
        }
        writeln!(index, "  </{}>", format.type_name()).map_err(io)?;
        writeln!(index, "</VTKFile>").map_err(io)?;

        fs::write(&self.index, index).map_err(|e| io_error(&self.index, e))?;
        Ok(file_names)
    }

    /// Remove whatever is left of the staged output
    fn remove(&self) {
        if self.data_dir.exists() {
            if let Err(e) = fs::remove_dir_all(&self.data_dir) {
                warn!("Could not remove {}: {e}", self.data_dir.display());
            }
        }
        if self.index.exists() {
            if let Err(e) = fs::remove_file(&self.index) {
                warn!("Could not remove {}: {e}", self.index.display());
            }
        }
    }
}

/// Replace the previous output at `path` by the staged output.
///
/// The old index goes first so it never refers to partitions of another run.
fn commit(staging: &Staging, data_dir: &Path, path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| io_error(path, e))?;
    }
    if data_dir.exists() {
        fs::remove_dir_all(data_dir).map_err(|e| io_error(data_dir, e))?;
    }
    fs::rename(&staging.data_dir, data_dir).map_err(|e| io_error(data_dir, e))?;
    fs::rename(&staging.index, path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, reason: impl ToString) -> Error {
    Error::container_io(path.display().to_string(), reason)
}

/// Write one primitive as a VTK XML PolyData file
pub fn write_polydata(data: &PolyData, path: &Path, title: &str) -> Result<()> {
    to_vtk(data, title)
        .export(path)
        .map_err(|e| Error::container_io(path.display().to_string(), format!("{e:?}")))
}

/// Convert a primitive to the `vtkio` data model
pub fn to_vtk(data: &PolyData, title: &str) -> Vtk {
    let piece = PolyDataPiece {
        points: IOBuffer::F64(
            data.points()
                .iter()
                .flat_map(|p| [p.x, p.y, p.z])
                .collect(),
        ),
        verts: None,
        lines: cells(data.lines()),
        polys: cells(data.polys()),
        strips: cells(data.strips()),
        data: Attributes {
            point: arrays(data.point_data(), data.active_scalars()),
            cell: arrays(data.cell_data(), data.active_scalars()),
        },
    };
    Vtk {
        version: Version { major: 1, minor: 0 },
        byte_order: ByteOrder::LittleEndian,
        title: title.to_string(),
        file_path: None,
        data: DataSet::PolyData {
            meta: None,
            pieces: vec![Piece::Inline(Box::new(piece))],
        },
    }
}

fn cells(cells: &[Vec<usize>]) -> Option<VertexNumbers> {
    if cells.is_empty() {
        return None;
    }
    let vertices = cells
        .iter()
        .flat_map(|cell| std::iter::once(cell.len()).chain(cell.iter().copied()))
        .map(|i| i as u32)
        .collect();
    Some(VertexNumbers::Legacy {
        num_cells: cells.len() as u32,
        vertices,
    })
}

/// Scalar arrays with the active scalars first
fn arrays(arrays: &[ScalarArray], active: Option<&str>) -> Vec<Attribute> {
    let is_active = |a: &&ScalarArray| Some(a.name.as_str()) == active;
    arrays
        .iter()
        .filter(is_active)
        .chain(arrays.iter().filter(|a| !is_active(a)))
        .map(|a| {
            Attribute::DataArray(DataArray {
                name: a.name.clone(),
                elem: ElementType::Scalars {
                    num_comp: 1,
                    lookup_table: None,
                },
                data: IOBuffer::F64(a.values.clone()),
            })
        })
        .collect()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Point;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            CollectionFormat::from_path(Path::new("tree.vtpc")),
            CollectionFormat::PartitionedCollection
        );
        assert_eq!(
            CollectionFormat::from_path(Path::new("out/tree.vtm")),
            CollectionFormat::MultiBlock
        );
        assert_eq!(
            CollectionFormat::from_path(Path::new("tree.vtk")),
            CollectionFormat::PartitionedCollection
        );
    }

    #[test]
    fn test_to_vtk() {
        let mut data = PolyData::from_points(vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ]);
        data.add_poly(vec![0, 1, 2]);
        data.add_line(vec![0, 1]);
        data.add_cell_data(ScalarArray::new("a", vec![1.0, 2.0]));
        data.add_cell_data(ScalarArray::new("b", vec![3.0, 4.0]));
        data.set_active_scalars("b");

        let vtk = to_vtk(&data, "test");
        let DataSet::PolyData { pieces, .. } = vtk.data else {
            panic!("expected poly data");
        };
        let Piece::Inline(piece) = &pieces[0] else {
            panic!("expected inline piece");
        };
        assert_eq!(piece.points.len(), 9);
        assert!(piece.strips.is_none());
        match &piece.polys {
            Some(VertexNumbers::Legacy {
                num_cells,
                vertices,
            }) => {
                assert_eq!(*num_cells, 1);
                assert_eq!(vertices, &vec![3, 0, 1, 2]);
            }
            _ => panic!("expected legacy polygons"),
        }
        let names = piece
            .data
            .cell
            .iter()
            .map(|a| match a {
                Attribute::DataArray(array) => array.name.clone(),
                Attribute::Field { name, .. } => name.clone(),
            })
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
