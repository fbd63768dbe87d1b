//! Host store backends for the catalog populator.
//!
//! [`HostClient`] talks to the host framework over HTTP; [`MemoryStore`]
//! keeps everything in process for dry runs and tests.

pub mod host;
pub mod memory;

pub use host::{HostClient, parse_entry, parse_find};
pub use memory::{MemoryStore, StoredUpload};
