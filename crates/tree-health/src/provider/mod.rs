//! Data provider access: the SODA client plus offline record sources.

pub mod client;
pub mod source;
pub mod types;

// Re-export main types
pub use client::CensusClient;
pub use source::{FileSource, RecordSource, StaticSource};
pub use types::CountQuery;
