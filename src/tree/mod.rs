//! Node tree addressing
//!
//! Turns node titles into store addresses and enumerates subtrees on disk.

pub mod path;
pub mod walker;
