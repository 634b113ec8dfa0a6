//! Tooling & Integration Layer
//!
//! External processes the stores hand work to.

pub mod editor;

pub use editor::Editor;
