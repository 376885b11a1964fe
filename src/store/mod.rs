//! # Record Store
//!
//! Durable create / read / update / delete of daily update records over a
//! synchronous key-value backend. Nothing else in the crate touches the
//! backend key.

pub mod backend;
pub mod errors;
pub mod file;
pub mod memory;
pub mod records;

pub use backend::KeyValueStore;
pub use errors::{StoreError, StoreResult};
pub use file::FileKv;
pub use memory::MemoryKv;
pub use records::{RecordStore, DEFAULT_STORAGE_KEY};
