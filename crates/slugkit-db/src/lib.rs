//! Persistence-facing half of slugkit: the record model, duplicate-count
//! filters, collection backends and the pre-save slug hook itself.

pub mod db;
pub mod error;
pub mod hook;
pub mod model;
