//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the picuniq application.
///
/// - 0: Success (destination fully populated, no per-file failures)
/// - 1: General error (discovery failed or unexpected failure)
/// - 3: Partial success (completed, but some files or groups failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: every discovered file was hashed and placed.
    Success = 0,
    /// General error: nothing useful could be done.
    GeneralError = 1,
    /// Partial success: the run completed with recorded per-file failures.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "PU000",
            Self::GeneralError => "PU001",
            Self::PartialSuccess => "PU003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "PU001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
