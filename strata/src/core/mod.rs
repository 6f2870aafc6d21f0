//! A module contain the interfaces, utilities and data-structures that are
//! shared by the other modules.

pub mod base;
pub mod config;
pub mod error;
pub mod geometry;
pub mod utils;
