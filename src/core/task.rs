//! Task kinds a module can expose.

use serde::{Deserialize, Serialize};

/// Kind of task a resolved configuration is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Source compilation
    Compile,
    /// Running the module's main entry point
    #[serde(alias = "exec", alias = "run")]
    Execute,
    /// Running the module's tests
    Test,
}

impl TaskKind {
    /// All task kinds, in configuration order.
    pub const ALL: [TaskKind; 3] = [TaskKind::Compile, TaskKind::Execute, TaskKind::Test];

    /// Get the task kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Compile => "compile",
            TaskKind::Execute => "execute",
            TaskKind::Test => "test",
        }
    }

    /// Whether this kind receives the mirrored compile/execute flag sequence.
    pub fn receives_flags(&self) -> bool {
        matches!(self, TaskKind::Compile | TaskKind::Execute)
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = TaskKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compile" => Ok(TaskKind::Compile),
            "execute" | "exec" | "run" => Ok(TaskKind::Execute),
            "test" => Ok(TaskKind::Test),
            _ => Err(TaskKindParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid task kind.
#[derive(Debug, Clone)]
pub struct TaskKindParseError(pub String);

impl std::fmt::Display for TaskKindParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid task kind '{}', valid values: compile, execute, test",
            self.0
        )
    }
}

impl std::error::Error for TaskKindParseError {}
