//! Command implementations

pub mod check;
pub mod completions;
pub mod conventions;
pub mod flags;
pub mod plan;
pub mod toolchain;
