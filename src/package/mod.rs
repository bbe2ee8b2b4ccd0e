pub mod builder;
pub mod materializer;
pub mod placeholder;
pub mod validator;

pub use builder::{ArtifactKind, PackageArtifact, PackageBuilder};
pub use materializer::{copy_tree, CopyOutcome, SkipReason, SkipReport};
pub use placeholder::PlaceholderBuilder;
pub use validator::{PackageValidator, ValidationResult};
