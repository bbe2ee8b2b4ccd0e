pub mod search_api;

pub use search_api::{AlternativeCandidate, SearchApi};
