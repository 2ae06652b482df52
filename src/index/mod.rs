//! Vector indexing for near-duplicate search.
//!
//! Provides an exact flat L2 index. Indexes are built per request from the
//! batch being deduplicated and never persisted.

pub mod flat;

pub use flat::{squared_l2_distance, FlatIndex, Neighbor};
