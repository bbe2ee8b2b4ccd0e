//! Extporter: browser extension packaging converter
//!
//! This crate provides the main extporter library, re-exporting core
//! functionality from `extporter-core` and organizing the modules for
//! profile discovery, manifest translation, package construction, and
//! the conversion pipeline.

pub use extporter_core::{format_error_with_help, ErrorHelp, ExtError, ExtResult, Manifest};

/// Core module re-exported for convenience.
pub mod core {
    pub use extporter_core::*;
    pub use extporter_core::core::*;

    /// Path module re-exported from extporter-core.
    pub mod path {
        pub use extporter_core::core::path::*;
    }
}

/// Configuration management.
pub mod config;

/// Browser profile and extension discovery.
pub mod profile;

/// Manifest name resolution and target-format translation.
pub mod manifest;

/// Package materialization, building, and validation.
pub mod package;

/// Commercial extension classification and curated alternatives.
pub mod commercial;

/// Add-on store search integration.
pub mod store;

/// Conversion pipeline orchestration.
pub mod convert;
