//! YAML manifest loading with `!include` expansion.
//!
//! Both the project manifest and individual page documents go through this
//! loader. An `!include other.yaml` tag anywhere in the document tree is
//! replaced by the parsed content of `other.yaml`, resolved relative to the
//! directory of the *including* file, not the process working directory.
//! Includes nest; a file may not include itself, directly or through a
//! chain.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tag that splices another YAML file into the document.
const INCLUDE_TAG: &str = "!include";

/// Manifest loading errors. The path is the file being loaded when the
/// failure occurred, which for nested includes is the included file.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed document `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("`!include` in `{path}` expects a file path")]
    BadInclude { path: PathBuf },

    #[error("include cycle: `{path}` is already being expanded")]
    IncludeCycle { path: PathBuf },
}

/// Load a YAML document from `path`, expanding `!include` tags.
pub fn load(path: &Path) -> Result<Value, ManifestError> {
    let mut in_flight = Vec::new();
    load_guarded(path, &mut in_flight)
}

/// `in_flight` holds the chain of canonical paths currently being
/// expanded; revisiting one means the includes form a cycle.
fn load_guarded(path: &Path, in_flight: &mut Vec<PathBuf>) -> Result<Value, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let canonical = path.canonicalize().map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if in_flight.contains(&canonical) {
        return Err(ManifestError::IncludeCycle {
            path: path.to_path_buf(),
        });
    }

    let document: Value = serde_yaml::from_str(&text).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let base = canonical
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    in_flight.push(canonical);
    let expanded = expand(document, &base, path, in_flight);
    in_flight.pop();
    expanded
}

/// Walk the document tree and substitute every `!include` tag with the
/// parsed content of the referenced file.
fn expand(
    value: Value,
    base: &Path,
    origin: &Path,
    in_flight: &mut Vec<PathBuf>,
) -> Result<Value, ManifestError> {
    match value {
        Value::Tagged(tagged) if tagged.tag == INCLUDE_TAG => {
            let Value::String(target) = tagged.value else {
                return Err(ManifestError::BadInclude {
                    path: origin.to_path_buf(),
                });
            };
            load_guarded(&base.join(target), in_flight)
        }
        Value::Mapping(mapping) => {
            let mut expanded = Mapping::with_capacity(mapping.len());
            for (key, entry) in mapping {
                expanded.insert(key, expand(entry, base, origin, in_flight)?);
            }
            Ok(Value::Mapping(expanded))
        }
        Value::Sequence(sequence) => sequence
            .into_iter()
            .map(|entry| expand(entry, base, origin, in_flight))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        other => Ok(other),
    }
}
