//! Template rendering over a tera environment scoped to a template root.
//!
//! Template references in page documents are paths relative to the root,
//! e.g. `base.html` or `partials/nav.html`. The environment also carries a
//! `markdown` filter backed by pulldown-cmark, usable as
//! `{{ body | markdown }}` or `{% filter markdown %}...{% endfilter %}`.

use pulldown_cmark::{Parser, html};
use std::collections::HashMap;
use std::error::Error as _;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

/// Reserved context variable holding the current page's source path.
pub const CURRENT_FILENAME_VAR: &str = "ANVIL_CURRENT_FILENAME";

/// Reserved context variable holding the page → output-file-name table.
pub const FILENAME_MAPPINGS_VAR: &str = "ANVIL_FILENAME_MAPPINGS";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot load templates under `{root}`: {detail}")]
    Load { root: PathBuf, detail: String },

    #[error("template `{name}` not found")]
    Resolve { name: String },

    #[error("cannot render `{name}`: {detail}")]
    Engine { name: String, detail: String },
}

/// Wraps a templating environment rooted at a template directory.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Load every template under `template_root`.
    pub fn new(template_root: &Path) -> Result<Self, RenderError> {
        let pattern = template_root.join("**/*");
        let mut tera = Tera::new(&pattern.to_string_lossy()).map_err(|err| RenderError::Load {
            root: template_root.to_path_buf(),
            detail: describe(&err),
        })?;
        tera.register_filter("markdown", markdown_filter);
        // Page context is trusted local input; values and markdown output
        // pass through without HTML escaping.
        tera.autoescape_on(vec![]);
        Ok(Self { tera })
    }

    /// Render `name` with the given context.
    pub fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        self.tera.render(name, context).map_err(|err| match err.kind {
            tera::ErrorKind::TemplateNotFound(_) => RenderError::Resolve {
                name: name.to_owned(),
            },
            _ => RenderError::Engine {
                name: name.to_owned(),
                detail: describe(&err),
            },
        })
    }
}

/// Flatten a tera error chain into one line. Tera's own Display is usually
/// just "Failed to render 'x'"; the actual cause sits in source().
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(err) = cause {
        let _ = write!(message, ": {err}");
        cause = err.source();
    }
    message
}

/// `{{ text | markdown }}` — render a markdown string to HTML.
fn markdown_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("markdown filter expects a string"))?;
    let mut rendered = String::with_capacity(text.len() * 2);
    html::push_html(&mut rendered, Parser::new(text));
    Ok(tera::Value::String(rendered))
}
