//! Trait definitions

mod container;
mod visitor;

pub use container::TreeContainer;
pub use visitor::CompartmentVisitor;
