//! Notebox: Personal Notes With Mirrored Stores
//!
//! Notes and folders live in a node store. A local filesystem store and a
//! sled-backed remote store implement the same contract, and the sync module
//! moves nodes between them with fetch, push and migrate.

pub mod cli;
pub mod config;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod node;
pub mod settings;
pub mod store;
pub mod sync;
pub mod tooling;
pub mod tree;
