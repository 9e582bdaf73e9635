pub mod document;

pub use document::{Document, JsonDocument};
