//! CLI command implementations.

pub mod check;
pub mod clean;
pub mod info;
pub mod merge;
