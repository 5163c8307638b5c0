//! High-level operations.
//!
//! This module contains the implementation of Berth commands.

pub mod berth_plan;
pub mod check;

pub use berth_plan::{module_flags, plan, write_plan, PlanOptions, Project};
pub use check::{check, CheckReport, ModuleCheck};
