//! Partitioned dataset collection
//!
//! The output of a conversion run: a sequence of named blocks, each holding one partition
//! per assembled primitive.
pub mod writer;

use crate::geometry::PolyData;
use crate::types::Result;
use log::info;
use std::path::{Path, PathBuf};

/// A named group of primitives of one organ kind
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    name: String,
    partitions: Vec<PolyData>,
}

impl Block {
    /// Block name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Partitions in insertion order
    pub fn partitions(&self) -> &[PolyData] {
        &self.partitions
    }

    /// Number of partitions
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Is the block empty?
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

/// Collection of named blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionedDataSetCollection {
    blocks: Vec<Block>,
}

impl PartitionedDataSetCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new block holding `partitions` and return its index
    pub fn add_block(&mut self, name: &str, partitions: Vec<PolyData>) -> usize {
        info!("Adding block {name} with {} partitions", partitions.len());
        self.blocks.push(Block {
            name: name.to_string(),
            partitions,
        });
        self.blocks.len() - 1
    }

    /// Append `partitions` to the block called `name`, adding the block if there is none
    pub fn extend_block(&mut self, name: &str, partitions: Vec<PolyData>) -> usize {
        match self.blocks.iter().position(|b| b.name == name) {
            Some(index) => {
                info!(
                    "Extending block {name} with {} partitions",
                    partitions.len()
                );
                self.blocks[index].partitions.extend(partitions);
                index
            }
            None => self.add_block(name, partitions),
        }
    }

    /// Blocks in insertion order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The first block called `name`
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Number of blocks
    pub fn number_of_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Number of partitions over all blocks
    pub fn number_of_partitions(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    /// Is the collection empty?
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Write the collection to `path`, see [writer::write_collection]
    pub fn write(&self, path: &Path) -> Result<Vec<PathBuf>> {
        writer::write_collection(self, path)
    }
}
