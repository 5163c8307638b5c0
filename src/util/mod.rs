//! Shared utilities

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod fs;
pub mod hash;
pub mod name;

pub use config::ToolchainConfig;
pub use context::GlobalContext;
pub use diagnostic::Diagnostic;
pub use name::Name;
