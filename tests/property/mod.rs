//! Property-based tests for the synchronizer
