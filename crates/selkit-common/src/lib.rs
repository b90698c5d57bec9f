//! Common utilities for the selkit toolkit.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - colored terminal output for legacy or rewritten input

pub mod warning;
