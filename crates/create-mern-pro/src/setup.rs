//! External setup commands: git, Python venv, package installs

use std::path::{Path, PathBuf};

use scaffold_core::process::{self, ProcessError};

use crate::error::ScaffoldError;
use crate::model::ProjectConfig;
use crate::ui::{self, Step};

/// `git init` in the project root
pub fn init_git(project_root: &Path) -> Result<(), ProcessError> {
    process::run("git", &["init"], project_root)?;
    tracing::info!(path = %project_root.display(), "initialized git repository");
    Ok(())
}

/// `python3 -m venv venv` in the backend directory
pub fn setup_python_env(backend_dir: &Path) -> Result<(), ProcessError> {
    process::run("python3", &["-m", "venv", "venv"], backend_dir)?;
    tracing::info!(path = %backend_dir.display(), "created Python virtual environment");
    Ok(())
}

/// Directories that get `<pm> install`: the frontend and a Node backend,
/// when they hold a `package.json`.
pub fn install_targets(project_root: &Path, config: &ProjectConfig) -> Vec<PathBuf> {
    let mut targets = Vec::new();
    if config.is_node_backend() {
        targets.push(project_root.join("backend"));
    }
    if config.frontend.is_some() {
        targets.push(project_root.join("frontend"));
    }
    targets.retain(|dir| dir.join("package.json").is_file());
    targets
}

/// Run `<pm> install` in one directory
pub fn install_in(dir: &Path, config: &ProjectConfig) -> Result<(), ScaffoldError> {
    let pm = config.package_manager.command();
    let name = dir_label(dir);

    let output = process::run(pm, &["install"], dir).map_err(|source| match source {
        ProcessError::NotFound(_) => ScaffoldError::Process(source),
        source => ScaffoldError::InstallFailed { dir: name, source },
    })?;

    tracing::debug!(stdout = %output.stdout.trim_end(), stderr = %output.stderr.trim_end(), "{pm} install output");
    tracing::info!(dir = %dir.display(), package_manager = pm, "installed dependencies");
    Ok(())
}

/// Install dependencies in every target directory, stopping at the first failure
pub fn install_dependencies(project_root: &Path, config: &ProjectConfig) -> Result<(), ScaffoldError> {
    let pm = config.package_manager.command();
    if !process::is_installed(pm) {
        return Err(ProcessError::NotFound(pm.to_string()).into());
    }

    for dir in install_targets(project_root, config) {
        let name = dir_label(&dir);
        let step = Step::start(&format!("Running {pm} install in {name}..."));
        match install_in(&dir, config) {
            Ok(()) => step.succeed(&format!("Dependencies installed in {name}")),
            Err(err) => {
                step.fail(&format!("Failed to install dependencies in {name}"));
                if let ScaffoldError::InstallFailed { source, .. } = &err {
                    if let Some(output) = source.output() {
                        ui::print_command_output(output);
                    }
                }
                return Err(err);
            }
        }
    }
    Ok(())
}

fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
