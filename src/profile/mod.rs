pub mod discovery;
pub mod extensions;

pub use discovery::{discover_profiles, Browser, BrowserProfile};
pub use extensions::{list_extensions, ExtensionDescriptor};
