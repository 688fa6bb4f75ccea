//! Project generation pipeline
//!
//! [`Generator`] produces the files of a new project without touching the
//! terminal. [`create_project`] runs it step by step under spinners and then
//! performs the external setup commands.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::env_files;
use crate::error::ScaffoldError;
use crate::features;
use crate::manifest;
use crate::model::ProjectConfig;
use crate::orm;
use crate::root_files;
use crate::setup;
use crate::templates::{self, ResolvedTemplates};
use crate::ui::{self, Step};
use crate::variables::Variables;

/// Writes a project tree from templates
#[derive(Debug, Clone)]
pub struct Generator {
    templates_root: PathBuf,
    author: Option<String>,
}

impl Generator {
    pub fn new(templates_root: impl Into<PathBuf>) -> Self {
        Self {
            templates_root: templates_root.into(),
            author: None,
        }
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn templates_root(&self) -> &Path {
        &self.templates_root
    }

    pub fn resolve(&self, config: &ProjectConfig) -> Result<ResolvedTemplates, ScaffoldError> {
        templates::resolve(&self.templates_root, config)
    }

    /// Create the project directory and its frontend/backend subdirectories
    pub fn create_structure(&self, dest: &Path, config: &ProjectConfig) -> Result<()> {
        fs::create_dir_all(dest)
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        if config.backend.is_some() {
            fs::create_dir_all(dest.join("backend"))?;
        }
        if config.frontend.is_some() {
            fs::create_dir_all(dest.join("frontend"))?;
        }
        Ok(())
    }

    /// Copy templates, then apply root files, features, ORM and package names
    pub fn copy_files(
        &self,
        resolved: &ResolvedTemplates,
        dest: &Path,
        config: &ProjectConfig,
    ) -> Result<usize> {
        let vars = Variables::new(&config.project_name, self.author.as_deref());
        let written = templates::copy_templates(resolved, dest, &vars)?;

        root_files::write_root_files(dest, config)?;
        features::apply(dest, config)?;
        if let Some(backend) = &config.backend {
            orm::configure(&dest.join("backend"), backend)
                .context("Failed to configure the ORM")?;
        }
        manifest::update_package_names(dest, &config.project_name)?;

        tracing::info!(files = written, dest = %dest.display(), "copied template files");
        Ok(written)
    }

    pub fn write_env(&self, dest: &Path, config: &ProjectConfig) -> Result<()> {
        env_files::write_env_files(dest, config)
    }

    /// Produce the whole file tree under `dest`; returns the template file count
    pub fn generate(&self, dest: &Path, config: &ProjectConfig) -> Result<usize> {
        let resolved = self.resolve(config)?;
        self.create_structure(dest, config)?;
        let written = self.copy_files(&resolved, dest, config)?;
        self.write_env(dest, config)?;
        Ok(written)
    }
}

/// Where and how to create the project
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Directory the project folder is created in
    pub cwd: PathBuf,
    /// Replace an existing destination directory
    pub force: bool,
}

/// Check the destination and clear it under `--force`
pub fn prepare_destination(dest: &Path, force: bool) -> Result<()> {
    if !dest.exists() {
        return Ok(());
    }
    if !force {
        return Err(ScaffoldError::DirectoryExists(dest.to_path_buf()).into());
    }

    tracing::warn!(path = %dest.display(), "removing existing directory");
    let removed = if dest.is_dir() {
        fs::remove_dir_all(dest)
    } else {
        fs::remove_file(dest)
    };
    removed.with_context(|| format!("Failed to remove {}", dest.display()))?;
    Ok(())
}

/// Run a step under a spinner, failing the spinner on error
fn run_step<T>(
    start: &str,
    done: &str,
    failed: &str,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let step = Step::start(start);
    match f() {
        Ok(value) => {
            step.succeed(done);
            Ok(value)
        }
        Err(err) => {
            step.fail(failed);
            Err(err)
        }
    }
}

/// Generate the project and run the setup commands. Returns its path.
pub fn create_project(
    config: &ProjectConfig,
    generator: &Generator,
    options: &CreateOptions,
) -> Result<PathBuf> {
    let dest = options.cwd.join(&config.project_name);
    let resolved = generator.resolve(config)?;
    prepare_destination(&dest, options.force)?;

    ui::print_summary(config);

    run_step(
        "Creating project structure...",
        "Project structure created",
        "Failed to create project structure",
        || generator.create_structure(&dest, config),
    )?;

    run_step(
        "Copying template files...",
        "Template files copied",
        "Failed to copy template files",
        || generator.copy_files(&resolved, &dest, config),
    )?;

    run_step(
        "Setting up environment files...",
        "Environment files created",
        "Failed to create environment files",
        || generator.write_env(&dest, config),
    )?;

    if config.is_python_backend() {
        let step = Step::start("Setting up Python virtual environment...");
        match setup::setup_python_env(&dest.join("backend")) {
            Ok(()) => step.succeed("Python virtual environment created"),
            Err(err) => {
                tracing::warn!(error = %err, "python venv setup failed");
                step.warn("Python virtual environment setup skipped (Python may not be installed)");
            }
        }
    }

    if config.init_git {
        let step = Step::start("Initializing git repository...");
        match setup::init_git(&dest) {
            Ok(()) => step.succeed("Git repository initialized"),
            Err(err) => {
                tracing::warn!(error = %err, "git init failed");
                step.warn("Git initialization skipped (git may not be installed)");
            }
        }
    }

    if config.install_deps {
        setup::install_dependencies(&dest, config)?;
    }

    ui::print_success(config);
    Ok(dest)
}
