//! Abstract data types that are used by the placer.

pub mod dag;
