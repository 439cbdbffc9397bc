//! Persisted key-value storage shared by all contexts.

mod local;
mod store;

pub use local::{Stamped, Storage};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
