//! Template resolution and copying
//!
//! Templates live under a root laid out as
//! `frontend/<framework>/<language>`, `backend/nodejs/<language>` and
//! `backend/python/<framework>`. The selected ones are copied into the new
//! project with placeholders substituted.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ScaffoldError;
use crate::model::{BackendRuntime, ProjectConfig};
use crate::variables::{is_binary_file, Variables};

/// Directory names never copied out of a backend template
pub const BACKEND_EXCLUDES: &[&str] = &["node_modules", "__pycache__", "venv"];

/// Directory names never copied out of a frontend template
pub const FRONTEND_EXCLUDES: &[&str] = &["node_modules"];

/// Which half of the stack a template provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Frontend,
    Backend,
}

impl TemplateKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Frontend => "Frontend",
            Self::Backend => "Backend",
        }
    }

    /// Subdirectory of the generated project
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
        }
    }

    pub fn excludes(&self) -> &'static [&'static str] {
        match self {
            Self::Frontend => FRONTEND_EXCLUDES,
            Self::Backend => BACKEND_EXCLUDES,
        }
    }
}

/// Template directories selected for a configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTemplates {
    pub frontend: Option<PathBuf>,
    pub backend: Option<PathBuf>,
}

impl ResolvedTemplates {
    /// Resolved templates in copy order (backend first)
    pub fn iter(&self) -> impl Iterator<Item = (TemplateKind, &Path)> {
        self.backend
            .as_deref()
            .map(|p| (TemplateKind::Backend, p))
            .into_iter()
            .chain(self.frontend.as_deref().map(|p| (TemplateKind::Frontend, p)))
    }
}

/// Map a configuration onto template directories under `root`.
///
/// Fails with `TemplateNotFound` when a selected directory does not exist.
pub fn resolve(root: &Path, config: &ProjectConfig) -> Result<ResolvedTemplates, ScaffoldError> {
    let frontend = config.frontend.as_ref().map(|frontend| {
        root.join("frontend")
            .join(frontend.framework.dir_name())
            .join(frontend.language.dir_name())
    });

    let backend = config.backend.as_ref().map(|backend| match backend.runtime {
        BackendRuntime::NodeJs(language) => {
            root.join("backend").join("nodejs").join(language.dir_name())
        }
        BackendRuntime::Python(framework) => {
            root.join("backend").join("python").join(framework.dir_name())
        }
    });

    let resolved = ResolvedTemplates { frontend, backend };

    for (kind, path) in resolved.iter() {
        if !path.is_dir() {
            return Err(ScaffoldError::TemplateNotFound {
                kind: kind.label(),
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(kind = kind.label(), path = %path.display(), "resolved template");
    }

    Ok(resolved)
}

/// True when any component of `rel_path` is an excluded directory name
fn is_excluded(rel_path: &Path, excludes: &[&str]) -> bool {
    rel_path
        .components()
        .any(|c| excludes.iter().any(|e| c.as_os_str() == *e))
}

/// Copy a template tree into `dest`, substituting variables in text files.
///
/// Returns the number of files written. A top-level `gitignore` is renamed
/// to `.gitignore` afterwards.
pub fn copy_template(src: &Path, dest: &Path, excludes: &[&str], vars: &Variables) -> Result<usize> {
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create destination: {}", dest.display()))?;

    let mut written = 0;

    let walker = WalkDir::new(src).into_iter().filter_entry(|entry| {
        entry
            .path()
            .strip_prefix(src)
            .map(|rel| !is_excluded(rel, excludes))
            .unwrap_or(true)
    });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk template: {}", src.display()))?;
        let src_path = entry.path();
        let rel_path = src_path.strip_prefix(src)?;

        // The root itself
        if rel_path.as_os_str().is_empty() {
            continue;
        }

        let mut dest_rel = PathBuf::new();
        for component in rel_path.components() {
            let component_str = component.as_os_str().to_string_lossy();
            dest_rel.push(vars.substitute(&component_str));
        }
        let dest_path = dest.join(&dest_rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .with_context(|| format!("Failed to create directory: {}", dest_path.display()))?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content =
            fs::read(src_path).with_context(|| format!("Failed to read: {}", src_path.display()))?;

        if is_binary_file(&content) {
            fs::write(&dest_path, &content)
                .with_context(|| format!("Failed to write: {}", dest_path.display()))?;
        } else {
            let text = String::from_utf8_lossy(&content);
            fs::write(&dest_path, vars.substitute(&text))
                .with_context(|| format!("Failed to write: {}", dest_path.display()))?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(src_meta) = src_path.metadata() {
                let src_mode = src_meta.permissions().mode();
                if src_mode & 0o111 != 0 {
                    let mut perms = fs::metadata(&dest_path)?.permissions();
                    perms.set_mode(src_mode);
                    fs::set_permissions(&dest_path, perms)?;
                }
            }
        }

        written += 1;
    }

    restore_gitignore(dest)?;

    tracing::debug!(src = %src.display(), dest = %dest.display(), files = written, "copied template");
    Ok(written)
}

/// Rename `gitignore` to `.gitignore` (npm drops dotfiles when publishing)
fn restore_gitignore(dir: &Path) -> Result<()> {
    let plain = dir.join("gitignore");
    if plain.is_file() {
        let dotted = dir.join(".gitignore");
        fs::rename(&plain, &dotted)
            .with_context(|| format!("Failed to rename {}", plain.display()))?;
    }
    Ok(())
}

/// Copy every resolved template into `<project>/<frontend|backend>`
pub fn copy_templates(
    resolved: &ResolvedTemplates,
    project_root: &Path,
    vars: &Variables,
) -> Result<usize> {
    let mut total = 0;
    for (kind, src) in resolved.iter() {
        let dest = project_root.join(kind.dir_name());
        total += copy_template(src, &dest, kind.excludes(), vars)
            .with_context(|| format!("Failed to copy {} template", kind.dir_name()))?;
    }
    Ok(total)
}
