//! Lignum VTK
//!
//! Convert trees of the Lignum growth model to VTK partitioned dataset collections: swept
//! tubes for the axes, triangles for kite leaves and lines for petioles, annotated with the
//! radius, foliage and radiation fields of the model.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod collect;
pub mod collection;
pub mod container;
pub mod convert;
pub mod geometry;
pub mod traits;
pub mod tree;
pub mod types;
