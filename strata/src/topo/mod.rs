//! The layered graph, the structures that are derived from it, and the placer
//! that assigns coordinates to it.

pub mod compaction;
pub mod graph;
pub mod placer;
