//! Error taxonomy for the build pipeline.
//!
//! Every fatal build failure surfaces as one line on stdout,
//! `<path>: error: <message>`, before the process exits non-zero. The path
//! is whatever the user can act on: the project directory for project-level
//! failures, the page source path for per-page failures, the asset entry
//! for copy failures.

use crate::manifest::ManifestError;
use crate::project::ValidationError;
use crate::render::RenderError;
use thiserror::Error;

/// Fatal build failure, tagged with the source path it concerns.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A manifest or page document could not be read or parsed.
    #[error("{path}: error: {error}")]
    Manifest { path: String, error: ManifestError },

    /// A required key is missing or ill-typed in a project or page document.
    #[error("{path}: error: {error}")]
    Validation { path: String, error: ValidationError },

    /// Template loading, resolution or expansion failed.
    #[error("{path}: error: {error}")]
    Template { path: String, error: RenderError },

    /// A filesystem operation failed outside the documented fallbacks.
    #[error("{path}: error: {error}")]
    Filesystem { path: String, error: std::io::Error },
}

impl BuildError {
    pub fn manifest(path: impl ToString, error: ManifestError) -> Self {
        Self::Manifest {
            path: path.to_string(),
            error,
        }
    }

    pub fn validation(path: impl ToString, error: ValidationError) -> Self {
        Self::Validation {
            path: path.to_string(),
            error,
        }
    }

    pub fn template(path: impl ToString, error: RenderError) -> Self {
        Self::Template {
            path: path.to_string(),
            error,
        }
    }

    pub fn filesystem(path: impl ToString, error: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.to_string(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_follow_the_reporting_format() {
        let err = BuildError::validation("pages/about.yaml", ValidationError::MissingTemplate);
        assert_eq!(
            err.to_string(),
            "pages/about.yaml: error: page requires 'template' key"
        );
    }

    #[test]
    fn filesystem_errors_carry_the_offending_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = BuildError::filesystem("static/logo.png", io);
        let line = err.to_string();
        assert!(line.starts_with("static/logo.png: error: "));
        assert!(line.contains("denied"));
    }
}
