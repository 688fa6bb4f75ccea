//! Errors specific to scaffolding

use std::path::PathBuf;
use thiserror::Error;

use scaffold_core::ProcessError;

/// Errors raised while collecting configuration or generating a project
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error(
        "Invalid project name \"{0}\": it must start with a letter and contain only letters, numbers, hyphens, and underscores"
    )]
    InvalidProjectName(String),

    #[error("Project type {project_type} requires {expected}")]
    InvalidProjectType {
        project_type: &'static str,
        expected: &'static str,
    },

    #[error("{orm} cannot be used with {runtime} and {database}")]
    IncompatibleOrm {
        orm: &'static str,
        runtime: &'static str,
        database: &'static str,
    },

    #[error("Directory \"{}\" already exists. Choose a different project name or use --force", .0.display())]
    DirectoryExists(PathBuf),

    #[error("{kind} template not found: {}", .path.display())]
    TemplateNotFound { kind: &'static str, path: PathBuf },

    #[error("Invalid manifest {}: {reason}", .path.display())]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Dependency installation failed in {dir}")]
    InstallFailed {
        dir: String,
        #[source]
        source: ProcessError,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),
}
