pub mod resolver;
pub mod transformer;

pub use resolver::{resolve_name, ResolvedName};
pub use transformer::{sanitize_name, slug, transform, TransformedManifest};
