// Adapters layer: concrete implementations of the domain ports and file formats.

pub mod csv;
pub mod json_store;
pub mod memory;

pub use json_store::{JsonFileStore, RosterSnapshot};
pub use memory::InMemoryStore;
