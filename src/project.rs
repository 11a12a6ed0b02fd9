//! Project and page document models.
//!
//! Both are thin validated views over the manifest document tree. The
//! project is parsed once per orchestrator construction; pages are parsed
//! fresh from disk on every render.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// File name of the project manifest inside the project directory.
pub const PROJECT_FILE_NAME: &str = "project.yaml";

/// Directory of template files inside the project directory.
pub const TEMPLATE_DIR_NAME: &str = "templates";

/// A required key is missing or has the wrong shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("project requires 'buildlist' key")]
    MissingBuildlist,

    #[error("'buildlist' must be a sequence of page paths")]
    InvalidBuildlist,

    #[error("'copy' must be a sequence of asset paths")]
    InvalidCopy,

    #[error("page requires 'template' key")]
    MissingTemplate,

    #[error("'template' must be a string")]
    InvalidTemplate,

    #[error("page context value for '{0}' cannot be passed to the template engine")]
    InvalidContext(String),
}

/// Top-level project manifest: pages to build, assets to copy.
#[derive(Debug, Clone)]
pub struct Project {
    /// Page source paths, rendered in this order.
    pub buildlist: Vec<String>,
    /// Asset source paths, copied in this order. Defaults to empty.
    pub copy: Vec<String>,
}

impl Project {
    pub fn from_value(document: &Value) -> Result<Self, ValidationError> {
        let mapping = document
            .as_mapping()
            .ok_or(ValidationError::MissingBuildlist)?;

        let buildlist = mapping
            .get("buildlist")
            .ok_or(ValidationError::MissingBuildlist)?;
        let buildlist = string_sequence(buildlist).ok_or(ValidationError::InvalidBuildlist)?;

        let copy = match mapping.get("copy") {
            Some(copy) => string_sequence(copy).ok_or(ValidationError::InvalidCopy)?,
            None => Vec::new(),
        };

        Ok(Self { buildlist, copy })
    }
}

/// One page document: a template reference plus free-form context entries
/// forwarded verbatim into template rendering.
#[derive(Debug, Clone)]
pub struct Page {
    pub template: String,
    pub context: Mapping,
}

impl Page {
    pub fn from_value(document: Value) -> Result<Self, ValidationError> {
        let Value::Mapping(mut mapping) = document else {
            return Err(ValidationError::MissingTemplate);
        };
        let template = match mapping.remove("template") {
            Some(Value::String(template)) => template,
            Some(_) => return Err(ValidationError::InvalidTemplate),
            None => return Err(ValidationError::MissingTemplate),
        };
        Ok(Self {
            template,
            context: mapping,
        })
    }
}

fn string_sequence(value: &Value) -> Option<Vec<String>> {
    value
        .as_sequence()?
        .iter()
        .map(|entry| entry.as_str().map(str::to_owned))
        .collect()
}
