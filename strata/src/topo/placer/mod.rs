//! This module contains the placer, the code that assigns X,Y coordinates to
//! all of the vertices in the graph and routes the edges between them.
//!
//! The slice coordinates are computed by the method of Brandes and Kopf: four
//! passes (left/right times upper/lower) align vertices into blocks and
//! compact the blocks against one side, and the results are combined.

mod aggregate;
mod bk;
mod compact;
mod layers;
mod route;
mod verifier;

pub mod place;
pub use layers::LayerGeometry;
pub use place::{CancelToken, Layout, Placer, Stage};
pub use verifier::Violation;
