use thiserror::Error;

/// Unified error type for docs-sync operations
#[derive(Error, Debug)]
pub enum DocsSyncError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Clone error: {0}")]
    Clone(String),

    #[error("GitHub API error: {0}")]
    Github(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in docs-sync
pub type Result<T> = std::result::Result<T, DocsSyncError>;

impl DocsSyncError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        DocsSyncError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        DocsSyncError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        DocsSyncError::Tag(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        DocsSyncError::Branch(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        DocsSyncError::Remote(msg.into())
    }

    /// Create a clone error with context
    pub fn clone_error(msg: impl Into<String>) -> Self {
        DocsSyncError::Clone(msg.into())
    }

    /// Create a GitHub API error with context
    pub fn github(msg: impl Into<String>) -> Self {
        DocsSyncError::Github(msg.into())
    }

    /// Create a template error with context
    pub fn template(msg: impl Into<String>) -> Self {
        DocsSyncError::Template(msg.into())
    }

    /// Create a command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        DocsSyncError::Command(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DocsSyncError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DocsSyncError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(DocsSyncError::version("test")
            .to_string()
            .contains("Version"));
        assert!(DocsSyncError::tag("test").to_string().contains("Tag"));
        assert!(DocsSyncError::github("test").to_string().contains("GitHub"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (DocsSyncError::config("x"), "Configuration error"),
            (DocsSyncError::version("x"), "Version parsing error"),
            (DocsSyncError::tag("x"), "Tag error"),
            (DocsSyncError::remote("x"), "Remote operation failed"),
            (DocsSyncError::clone_error("x"), "Clone error"),
            (DocsSyncError::github("x"), "GitHub API error"),
            (DocsSyncError::command("x"), "Command failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
