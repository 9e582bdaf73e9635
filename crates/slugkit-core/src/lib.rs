//! Core building blocks for slug generation: text folding, tokenizing,
//! configuration and shared error types. Nothing in this crate performs I/O
//! beyond loading configuration.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod types;
pub mod util;
