//! The error type that is shared by the graph builder, the parser and the
//! placer.

/// Reports invalid input and aborted layouts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown vertex handle {0}")]
    UnknownVertex(usize),
    #[error("self edge on vertex {0} is not supported")]
    SelfEdge(usize),
    #[error("vertex {0} is not an original vertex")]
    NotOriginal(usize),
    #[error("vertex {0} is not an unclaimed dummy vertex")]
    NotAFreeDummy(usize),
    #[error("vertex {0} is isolated and cannot be connected")]
    IsolatedEndpoint(usize),
    #[error("edge hop {from} -> {to} jumps from layer {from_layer} to layer {to_layer}")]
    LayerGap {
        from: usize,
        to: usize,
        from_layer: usize,
        to_layer: usize,
    },
    #[error("dummy vertex {0} is not part of any edge")]
    DanglingDummy(usize),
    #[error("segments {0} and {1} cross each other")]
    CrossingSegments(usize, usize),
    #[error("invalid value '{value}' for {option}")]
    InvalidOption { option: &'static str, value: String },
    #[error("parse error at offset {pos}: {message}")]
    Parse { pos: usize, message: String },
    #[error("unknown name '{0}'")]
    UnknownName(String),
    #[error("name '{0}' is defined twice")]
    DuplicateName(String),
    #[error("layout was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
