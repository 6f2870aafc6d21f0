//! A module that contains everything that has to do with handling the layered
//! graph file format (parsing, building a layered graph, etc.)
//!
//! A file lists the layers from the top down. Each layer lists its vertices
//! in order, and the edges name the dummy vertices that they pass through:
//!
//! ```txt
//! layer { node a [40, 20]; }
//! layer { node b; dummy d0; }
//! layer { dummy d1; }
//! layer { node c; }
//! edge a -> b;
//! edge a -> c via d0, d1;
//! isolated z [10, 10];
//! ```

pub mod builder;
pub mod parser;

pub use builder::{GraphBuilder, NamedGraph};
pub use parser::dump_ast;
pub use parser::LgfParser;
