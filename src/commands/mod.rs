//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod convert;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use convert::{convert_file, convert_reader, execute_convert, validate_args};
pub use models::{ConvertArgs, ConvertReport, ConvertedTrack};
pub use utils::{discover_inputs, display_version, inspect_file};
