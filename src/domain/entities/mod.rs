mod container;
mod document;

pub use container::Container;
pub use document::{Document, NewDocument};
