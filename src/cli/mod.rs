pub mod alternatives;
pub mod convert;
pub mod list;
