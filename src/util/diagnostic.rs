//! User-friendly diagnostic messages.
//!
//! Every error shown to the user names the offending input, the surrounding
//! facts (available toolchains, known conventions) and a suggested fix.

use std::fmt;
use std::path::{Path, PathBuf};

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource,
    SourceSpan,
};
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no manifest file is found.
    pub const NO_MANIFEST: &str = "Create a Berth.toml declaring a [[convention]] and a [[module]]";

    /// Suggestion when a convention id does not resolve.
    pub const LIST_CONVENTIONS: &str = "Run `berth conventions` to see registered conventions";

    /// Suggestion when no toolchain matches.
    pub const TOOLCHAIN_CONFIG: &str =
        "Declare it under [[toolchains.installed]] in .berth/toolchains.toml, or set JAVA_HOME";

    /// Suggestion when a module id is not declared.
    pub const DECLARE_MODULE: &str = "Declare the module with a [[module]] entry in Berth.toml";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self, color: bool) -> &'static str {
        match (self, color) {
            (Severity::Error, true) => "\x1b[1;31merror\x1b[0m",
            (Severity::Warning, true) => "\x1b[1;33mwarning\x1b[0m",
            (Severity::Error, false) => "error",
            (Severity::Warning, false) => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label(false))
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message)
    }

    fn with_severity(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = format!("{}: {}\n", self.severity.label(color), self.message);

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help = if color { "\x1b[1;32mhelp\x1b[0m" } else { "help" };
            output.push_str(&format!("{}: consider:\n", help));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Syntax or schema error in a manifest, labelled at the offending span.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("invalid manifest: {message}")]
#[diagnostic(code(berth::manifest::syntax))]
pub struct ManifestSyntaxError {
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl ManifestSyntaxError {
    /// Build from a TOML deserialization error.
    pub fn from_toml(path: &Path, contents: &str, err: &toml::de::Error) -> Self {
        ManifestSyntaxError {
            message: err.message().to_string(),
            src: NamedSource::new(path.display().to_string(), contents.to_string()),
            span: err.span().map(SourceSpan::from),
        }
    }
}

/// Render a miette diagnostic (with source snippet) to a string.
pub fn render_report(diagnostic: &dyn MietteDiagnostic, color: bool) -> String {
    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let mut out = String::new();
    if GraphicalReportHandler::new_themed(theme)
        .render_report(&mut out, diagnostic)
        .is_err()
    {
        out = format!("error: {}\n", diagnostic);
    }
    out
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("no toolchain available for language version 21")
            .with_context("available versions: 11, 17")
            .with_suggestion("Install a version 21 toolchain")
            .with_suggestion(suggestions::TOOLCHAIN_CONFIG);

        let output = diag.format(false);
        assert!(output.starts_with("error: no toolchain available"));
        assert!(output.contains("  = available versions: 11, 17"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Install a version 21 toolchain"));
        assert!(output.contains("2. Declare it under"));
    }

    #[test]
    fn test_location_line() {
        let diag = Diagnostic::warning("unused feature").with_location("Berth.toml");
        assert_eq!(diag.format(false), "warning: unused feature\n  --> Berth.toml\n");
    }

    #[test]
    fn test_manifest_syntax_error_has_span() {
        let contents = "[[convention]]\nid = \n";
        let err = toml::from_str::<toml::Value>(contents).unwrap_err();
        let diag = ManifestSyntaxError::from_toml(Path::new("Berth.toml"), contents, &err);
        assert!(diag.span.is_some());

        let rendered = render_report(&diag, false);
        assert!(rendered.contains("Berth.toml"));
    }
}
