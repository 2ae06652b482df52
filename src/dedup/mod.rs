//! Near-duplicate suppression over text embeddings.
//!
//! # Algorithm
//!
//! ```text
//! 1. N <= 1: return input unchanged (no embedder call)
//! 2. Embed all N texts in one provider call
//! 3. Build a flat L2 index over the N vectors
//! 4. For each item i, in input order:
//!      per-item:   nearest other item j; keep i iff dist(i, j) > threshold
//!      keep-first: drop i iff some earlier kept j has dist(i, j) <= threshold
//! 5. Return survivors in input order
//! ```
//!
//! Under `per-item` (the default) both members of a near-duplicate pair are
//! dropped, since each sees the other as its nearest neighbour. `keep-first`
//! keeps one representative per cluster.

mod deduplicator;
mod policy;
mod report;

pub use deduplicator::Deduplicator;
pub use policy::{DedupConfig, DedupPolicy, SIMILARITY_THRESHOLD};
pub use report::{DedupReport, DroppedItem};
