//! Convention resolution error types and diagnostics.
//!
//! Every error here stems from static input (a manifest, a toolchain list)
//! and reproduces on every run, so none of them are retried. Each variant
//! carries the offending identifier or value.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::flag::FlagSequence;
use crate::core::task::TaskKind;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while populating the registry or configuring modules.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ConventionError {
    #[error("convention `{id}` is already registered")]
    #[diagnostic(
        code(berth::registry::duplicate),
        help("give the new definition its own id, or declare it with `supersedes = true` and a higher revision")
    )]
    DuplicateConvention { id: String, existing_revision: u32 },

    #[error("unknown convention `{id}`")]
    #[diagnostic(code(berth::registry::unknown))]
    UnknownConvention { id: String, known: Vec<String> },

    #[error("convention `{id}` revision {attempted} does not supersede revision {current}")]
    #[diagnostic(
        code(berth::registry::stale_revision),
        help("a superseding definition must carry a strictly greater revision")
    )]
    StaleRevision {
        id: String,
        current: u32,
        attempted: u32,
    },

    #[error("invalid revision {value} for convention `{id}`")]
    #[diagnostic(
        code(berth::registry::invalid_revision),
        help("revisions start at 1")
    )]
    InvalidRevision { id: String, value: u32 },

    #[error("no toolchain available for language version {version}")]
    #[diagnostic(code(berth::toolchain::unavailable))]
    ToolchainUnavailable { version: u32, available: Vec<u32> },

    #[error(
        "module `{module}` targets language version {language_version} but declares \
         source compatibility {source_compatibility} and target compatibility {target_compatibility}"
    )]
    #[diagnostic(
        code(berth::toolchain::incompatible),
        help("source and target compatibility must both equal the convention's language version")
    )]
    IncompatibleVersion {
        module: String,
        language_version: u32,
        source_compatibility: u32,
        target_compatibility: u32,
    },

    #[error("invalid language version {value} for `{subject}`")]
    #[diagnostic(
        code(berth::toolchain::invalid_version),
        help("language versions are positive integers, e.g. 17")
    )]
    InvalidLanguageVersion { subject: String, value: i64 },

    #[error("malformed coordinate `{coordinate}`: {reason}")]
    #[diagnostic(
        code(berth::manifest::malformed_coordinate),
        help("coordinates have the form `group:artifact:version`")
    )]
    MalformedCoordinate {
        coordinate: String,
        reason: &'static str,
    },

    #[error("configuration of `{subject}` is locked")]
    #[diagnostic(code(berth::configure::locked))]
    ConfigurationLocked { subject: String },

    #[error("compile and execute flags diverge for module `{module}` (convention `{convention}`)")]
    #[diagnostic(code(berth::configure::flag_divergence))]
    FlagDivergence {
        module: String,
        convention: String,
        compile: FlagSequence,
        execute: FlagSequence,
    },

    #[error("unknown module `{id}`")]
    #[diagnostic(code(berth::configure::unknown_module))]
    UnknownModule { id: String, known: Vec<String> },

    #[error("module `{module}` does not declare a {kind} task")]
    #[diagnostic(code(berth::configure::undeclared_task))]
    UndeclaredTask { module: String, kind: TaskKind },
}

impl ConventionError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConventionError::DuplicateConvention {
                id,
                existing_revision,
            } => Diagnostic::error(format!("convention `{}` is already registered", id))
                .with_context(format!(
                    "revision {} of `{}` was registered first and is kept",
                    existing_revision, id
                ))
                .with_suggestion(format!("Rename the second definition of `{}`", id))
                .with_suggestion(format!(
                    "Mark it `supersedes = true` with a revision above {}",
                    existing_revision
                )),

            ConventionError::UnknownConvention { id, known } => {
                let mut diag = Diagnostic::error(format!("unknown convention `{}`", id));
                if !known.is_empty() {
                    diag = diag.with_context(format!("registered conventions: {}", known.join(", ")));
                }
                diag.with_suggestion(suggestions::LIST_CONVENTIONS)
            }

            ConventionError::StaleRevision {
                id,
                current,
                attempted,
            } => Diagnostic::error(format!("convention `{}` cannot be superseded", id))
                .with_context(format!("active revision: {}", current))
                .with_context(format!("attempted revision: {}", attempted))
                .with_suggestion(format!("Bump the revision of `{}` above {}", id, current)),

            ConventionError::InvalidRevision { id, value } => {
                Diagnostic::error(format!("invalid revision {} for convention `{}`", value, id))
                    .with_suggestion("Use a revision of 1 or higher")
            }

            ConventionError::ToolchainUnavailable { version, available } => {
                let mut diag = Diagnostic::error(format!(
                    "no toolchain available for language version {}",
                    version
                ));
                if available.is_empty() {
                    diag = diag.with_context("no toolchains were found");
                } else {
                    let versions: Vec<String> = available.iter().map(u32::to_string).collect();
                    diag = diag.with_context(format!("available versions: {}", versions.join(", ")));
                }
                diag.with_suggestion(format!("Install a version {} toolchain", version))
                    .with_suggestion(suggestions::TOOLCHAIN_CONFIG)
            }

            ConventionError::IncompatibleVersion {
                module,
                language_version,
                source_compatibility,
                target_compatibility,
            } => Diagnostic::error(format!("incompatible versions for module `{}`", module))
                .with_context(format!("language version: {}", language_version))
                .with_context(format!("source compatibility: {}", source_compatibility))
                .with_context(format!("target compatibility: {}", target_compatibility))
                .with_suggestion(format!(
                    "Set both compatibilities of `{}` to {} or remove them",
                    module, language_version
                )),

            ConventionError::InvalidLanguageVersion { subject, value } => {
                Diagnostic::error(format!("invalid language version {} for `{}`", value, subject))
                    .with_suggestion("Use a positive integer such as 17 or 21")
            }

            ConventionError::MalformedCoordinate { coordinate, reason } => {
                Diagnostic::error(format!("malformed coordinate `{}`", coordinate))
                    .with_context(*reason)
                    .with_suggestion("Write coordinates as `group:artifact:version`")
            }

            ConventionError::ConfigurationLocked { subject } => {
                Diagnostic::error(format!("configuration of `{}` is locked", subject))
                    .with_context("the configuration phase has already completed")
                    .with_suggestion("Apply all changes before the configuration is finalized")
            }

            ConventionError::FlagDivergence {
                module,
                convention,
                compile,
                execute,
            } => Diagnostic::error(format!(
                "compile and execute flags diverge for module `{}`",
                module
            ))
            .with_context(format!("convention: {}", convention))
            .with_context(format!("compile: [{}]", compile))
            .with_context(format!("execute: [{}]", execute))
            .with_suggestion("Declare feature flags on the convention so both tasks receive them"),

            ConventionError::UnknownModule { id, known } => {
                let mut diag = Diagnostic::error(format!("unknown module `{}`", id));
                if !known.is_empty() {
                    diag = diag.with_context(format!("declared modules: {}", known.join(", ")));
                }
                diag.with_suggestion(suggestions::DECLARE_MODULE)
            }

            ConventionError::UndeclaredTask { module, kind } => {
                Diagnostic::error(format!("module `{}` does not declare a {} task", module, kind))
                    .with_suggestion(format!("Add \"{}\" to the module's `tasks` list", kind))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_diagnostic_mentions_kept_revision() {
        let err = ConventionError::DuplicateConvention {
            id: "java-lib".to_string(),
            existing_revision: 1,
        };
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("error: convention `java-lib` is already registered"));
        assert!(output.contains("revision 1 of `java-lib` was registered first"));
        assert!(output.contains("help: consider:"));
    }

    #[test]
    fn test_toolchain_unavailable_lists_versions() {
        let err = ConventionError::ToolchainUnavailable {
            version: 21,
            available: vec![11, 17],
        };
        assert_eq!(err.to_string(), "no toolchain available for language version 21");
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("available versions: 11, 17"));
    }

    #[test]
    fn test_miette_codes() {
        let err = ConventionError::UnknownConvention {
            id: "missing".to_string(),
            known: vec![],
        };
        let code = MietteDiagnostic::code(&err).map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("berth::registry::unknown"));
    }
}
