// Core functionality
pub mod core;

// Extension manifest document
pub mod manifest;

// Re-export commonly used types
pub use core::{format_error_with_help, ErrorHelp, ExtError, ExtResult};
pub use manifest::Manifest;
