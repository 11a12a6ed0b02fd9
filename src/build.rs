//! Build orchestration.
//!
//! [`Anvil`] owns the validated project, the template renderer and the path
//! mapping, and drives one full build pass: reset or create the output
//! directory, render every page in buildlist order, copy every asset.

use crate::assets::copy_entry;
use crate::errors::BuildError;
use crate::log;
use crate::manifest;
use crate::paths::{self, filename_mappings};
use crate::project::{PROJECT_FILE_NAME, Page, Project, TEMPLATE_DIR_NAME};
use crate::render::{CURRENT_FILENAME_VAR, FILENAME_MAPPINGS_VAR, Renderer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tera::Context;

/// Build orchestrator. Holds everything derived from the project manifest;
/// watch mode constructs a fresh instance per rebuild so manifest edits
/// take effect without a restart.
#[derive(Debug)]
pub struct Anvil {
    project_dir: PathBuf,
    output_dir: PathBuf,
    clean: bool,
    project: Project,
    renderer: Renderer,
    mappings: BTreeMap<String, String>,
}

impl Anvil {
    /// Load and validate the project manifest, set up the template
    /// environment and compute the path mapping. No output-directory I/O
    /// happens here; a project that fails validation never touches the
    /// output.
    pub fn new(project_dir: &Path, output_dir: &Path, clean: bool) -> Result<Self, BuildError> {
        let manifest_path = project_dir.join(PROJECT_FILE_NAME);
        let document = manifest::load(&manifest_path)
            .map_err(|error| BuildError::manifest(manifest_path.display(), error))?;
        let project = Project::from_value(&document)
            .map_err(|error| BuildError::validation(project_dir.display(), error))?;

        let renderer = Renderer::new(&project_dir.join(TEMPLATE_DIR_NAME))
            .map_err(|error| BuildError::template(project_dir.display(), error))?;
        let mappings = filename_mappings(&project.buildlist);

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            clean,
            project,
            renderer,
            mappings,
        })
    }

    /// Run one full build pass: pages first, assets second, both in
    /// manifest order. The first failure aborts the pass.
    pub fn build(&self) -> Result<(), BuildError> {
        self.prepare_output_dir()?;

        for page_path in &self.project.buildlist {
            self.render_page(page_path)?;
        }
        for source in &self.project.copy {
            self.copy_asset(source)?;
        }

        log!(
            "build";
            "{} pages rendered, {} entries copied",
            self.project.buildlist.len(),
            self.project.copy.len()
        );
        Ok(())
    }

    /// Reset the output directory in clean mode, otherwise just make sure
    /// it exists.
    fn prepare_output_dir(&self) -> Result<(), BuildError> {
        let result = if self.clean {
            reset_dir(&self.output_dir)
        } else {
            fs::create_dir_all(&self.output_dir)
        };
        result.map_err(|error| BuildError::filesystem(self.output_dir.display(), error))
    }

    /// Load, validate and render one page, writing the result under its
    /// mapped output name. Output-name collisions silently overwrite; the
    /// page later in buildlist order wins.
    fn render_page(&self, page_path: &str) -> Result<(), BuildError> {
        let document = manifest::load(&self.project_dir.join(page_path))
            .map_err(|error| BuildError::manifest(page_path, error))?;
        let page = Page::from_value(document)
            .map_err(|error| BuildError::validation(page_path, error))?;

        let mut context = Context::new();
        for (key, value) in &page.context {
            if let Value::String(key) = key {
                context
                    .try_insert(key.as_str(), value)
                    .map_err(|_| {
                        BuildError::validation(
                            page_path,
                            crate::project::ValidationError::InvalidContext(key.clone()),
                        )
                    })?;
            }
        }
        // Injected last: reserved variables beat page-local keys of the
        // same name.
        context.insert(CURRENT_FILENAME_VAR, page_path);
        context.insert(FILENAME_MAPPINGS_VAR, &self.mappings);

        let rendered = self
            .renderer
            .render(&page.template, &context)
            .map_err(|error| BuildError::template(page_path, error))?;

        let output_name = paths::output_file_name(page_path);
        fs::write(self.output_dir.join(&output_name), rendered)
            .map_err(|error| BuildError::filesystem(page_path, error))?;

        log!("render"; "{page_path} -> {output_name}");
        Ok(())
    }

    /// Copy one asset entry into the output directory, preserving its
    /// relative source path.
    fn copy_asset(&self, source: &str) -> Result<(), BuildError> {
        copy_entry(
            &self.project_dir.join(source),
            &self.output_dir.join(source),
        )
        .map_err(|error| BuildError::filesystem(source, error))?;
        log!("copy"; "{source}");
        Ok(())
    }
}

/// Empty out `dir`, or create it (with intermediates) when absent.
/// Directories are removed recursively; a removal attempt on a plain file
/// falls back to unlinking just that file.
fn reset_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        return fs::create_dir_all(dir);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        match fs::remove_dir_all(&path) {
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::NotADirectory | io::ErrorKind::InvalidInput
                ) =>
            {
                fs::remove_file(&path)?;
            }
            other => other?,
        }
    }
    Ok(())
}
