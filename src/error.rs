//! Error types for property resolution and document loading.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by user-supplied callables, promises and resources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors during property resolution.
///
/// Malformed selection headers and missing dot-paths are never errors; only
/// failures of the values themselves surface here.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("property '{path}' failed to evaluate: {source}")]
    Invocation {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("promise for property '{path}' was rejected: {source}")]
    PromiseRejected {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("resource for property '{path}' failed to render: {source}")]
    Resource {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("property '{path}' resolved to a {kind} instead of plain data")]
    Unresolved { path: String, kind: &'static str },
}

/// Errors while loading property documents or resolver configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Content errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid properties document: expected object at top level, got {actual}")]
    NotAnObject { actual: String },

    #[error("invalid configuration: {source}")]
    InvalidConfig {
        #[source]
        source: serde_json::Error,
    },
}

impl ResolveError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Dot-path of the property that failed.
    pub fn path(&self) -> &str {
        match self {
            ResolveError::Invocation { path, .. }
            | ResolveError::PromiseRejected { path, .. }
            | ResolveError::Resource { path, .. }
            | ResolveError::Unresolved { path, .. } => path,
        }
    }
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("props.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::NotAnObject {
            actual: "array".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn resolve_error_reports_path() {
        let err = ResolveError::Invocation {
            path: "user.stats".into(),
            source: "boom".into(),
        };
        assert_eq!(err.path(), "user.stats");
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "property 'user.stats' failed to evaluate: boom"
        );
    }

    #[test]
    fn unresolved_display() {
        let err = ResolveError::Unresolved {
            path: "feed".into(),
            kind: "callable",
        };
        assert_eq!(
            err.to_string(),
            "property 'feed' resolved to a callable instead of plain data"
        );
    }
}
