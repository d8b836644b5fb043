// src/config/mod.rs

//! Pipeline topology configuration.
//!
//! - [`model`] defines the raw and validated TOML shapes.
//! - [`loader`] reads a file into the raw shape.
//! - [`validate`] checks references and converts raw to validated.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{PipelineFile, RawPipelineFile, TaskEntry};
