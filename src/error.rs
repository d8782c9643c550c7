/*!
 * Error handling for claim normalization operations
 *
 * Provides detailed error types with context, suggestions, and recovery guidance.
 * Only profile-configuration defects are fatal; everything file-scoped is meant
 * to be caught at the file-processing boundary and converted to a skip notice.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Claim normalization result type
pub type Result<T> = std::result::Result<T, ClaimsError>;

/// Error types with context and suggestions
#[derive(Error, Debug)]
pub enum ClaimsError {
    /// File I/O errors with context
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
        context: ErrorContext,
    },

    /// Workbook/sheet reading errors
    #[error("Sheet read error: {message}")]
    SheetRead {
        message: String,
        context: ErrorContext,
    },

    /// Requested sheet is not present in the workbook
    #[error("Sheet '{sheet}' not found in '{path}'")]
    MissingSheet {
        sheet: String,
        path: PathBuf,
    },

    /// A raw column named by the profile's field map is absent from the sheet
    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumn {
        column: String,
        sheet: String,
        context: ErrorContext,
    },

    /// Profile fails the 15-field coverage invariant. Fatal at registry build.
    #[error("Profile '{profile}' coverage error: {message}")]
    ProfileCoverage {
        profile: String,
        message: String,
    },

    /// The fixed-coordinate claimant name cell did not split into two tokens
    #[error("Malformed claimant name cell: {message}")]
    MalformedNameCell {
        message: String,
        value: String,
        context: ErrorContext,
    },

    /// Output writing failed
    #[error("Sink write error for '{path}': {message}")]
    SinkWrite {
        path: PathBuf,
        message: String,
    },

    /// File not found with suggestions
    #[error("File not found: {path}")]
    FileNotFound {
        path: PathBuf,
        suggestion: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        suggestion: Option<String>,
    },

    /// Generic errors with custom message
    #[error("{message}")]
    Custom {
        message: String,
        suggestion: Option<String>,
    },
}

/// Error context providing additional information
#[derive(Debug, Default, Clone)]
pub struct ErrorContext {
    pub file_path: Option<PathBuf>,
    pub sheet_name: Option<String>,
    pub row_number: Option<usize>,
}

impl ErrorContext {
    pub fn for_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }
}

impl ClaimsError {
    /// Create a file not found error with a helpful suggestion
    pub fn file_not_found(path: PathBuf) -> Self {
        let suggestion = format!(
            "Check if the file exists at '{}'. Make sure the path is correct and you have read permissions.",
            path.display()
        );
        Self::FileNotFound { path, suggestion }
    }

    /// Create a coverage error naming the offending profile
    pub fn profile_coverage(profile: &str, message: impl Into<String>) -> Self {
        Self::ProfileCoverage {
            profile: profile.to_string(),
            message: message.into(),
        }
    }

    /// Create a malformed name cell error with the offending value
    pub fn malformed_name_cell(value: &str, context: ErrorContext) -> Self {
        let token_count = value.split_whitespace().count();
        Self::MalformedNameCell {
            message: format!(
                "expected exactly two whitespace-separated tokens, found {}",
                token_count
            ),
            value: value.to_string(),
            context,
        }
    }

    /// Create a missing column error
    pub fn missing_column(column: &str, sheet: &str, context: ErrorContext) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            sheet: sheet.to_string(),
            context,
        }
    }

    /// Whether this error is file-scoped (skip the file, continue the batch)
    /// as opposed to a configuration defect that must abort the run.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::ProfileCoverage { .. } | Self::Configuration { .. }
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::FileNotFound { suggestion, .. } => {
                format!("{}\n\nSuggestion: {}", self, suggestion)
            }
            Self::MalformedNameCell { value, .. } => {
                format!("{}\n\nCell value: '{}'", self, value)
            }
            Self::Configuration { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            Self::Custom { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            _ => self.to_string(),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for ClaimsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            context: ErrorContext::default(),
        }
    }
}

impl From<csv::Error> for ClaimsError {
    fn from(err: csv::Error) -> Self {
        Self::SinkWrite {
            path: PathBuf::new(),
            message: err.to_string(),
        }
    }
}

impl From<calamine::XlsxError> for ClaimsError {
    fn from(err: calamine::XlsxError) -> Self {
        Self::SheetRead {
            message: err.to_string(),
            context: ErrorContext::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability_split() {
        let fatal = ClaimsError::profile_coverage("BCBS", "missing PaidDate");
        assert!(!fatal.is_recoverable());

        let per_file = ClaimsError::malformed_name_cell("John", ErrorContext::default());
        assert!(per_file.is_recoverable());
    }

    #[test]
    fn test_malformed_name_cell_counts_tokens() {
        let err = ClaimsError::malformed_name_cell("John Q Smith", ErrorContext::default());
        match err {
            ClaimsError::MalformedNameCell { message, value, .. } => {
                assert!(message.contains("found 3"));
                assert_eq!(value, "John Q Smith");
            }
            _ => panic!("wrong variant"),
        }
    }
}
