//! Model persistence
//!
//! Fitted models are written into the job's [`OutputDir`] as checksummed
//! binary artifacts and can be loaded back with [`load_model`].

mod output;
mod serializer;

pub use output::OutputDir;
pub use serializer::{load_metadata, load_model, save_model, ModelMetadata};
