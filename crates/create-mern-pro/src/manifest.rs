//! Package manifests: `package.json` and `requirements.txt`
//!
//! `package.json` is rewritten structurally (key order preserved, 2-space
//! indent, trailing newline). `requirements.txt` is a list of lines.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScaffoldError;

const DEPENDENCIES: &str = "dependencies";
const DEV_DEPENDENCIES: &str = "devDependencies";

/// A loaded `package.json`
#[derive(Debug, Clone)]
pub struct PackageJson {
    path: PathBuf,
    root: Map<String, Value>,
}

impl PackageJson {
    /// Load `path`, or `None` when it does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| ScaffoldError::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match value {
            Value::Object(root) => Ok(Some(Self {
                path: path.to_path_buf(),
                root,
            })),
            _ => Err(ScaffoldError::InvalidManifest {
                path: path.to_path_buf(),
                reason: "top-level value is not an object".to_string(),
            }
            .into()),
        }
    }

    pub fn save(&self) -> Result<()> {
        let mut json = serde_json::to_string_pretty(&self.root)?;
        json.push('\n');
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write: {}", self.path.display()))?;
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.root.get("name").and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: &str) {
        self.root.insert("name".to_string(), Value::String(name.to_string()));
    }

    fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.root.get(key).and_then(Value::as_object)
    }

    fn insert_into(&mut self, key: &str, package: &str, version: &str) {
        let entry = self
            .root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(section) = entry {
            section.insert(package.to_string(), Value::String(version.to_string()));
        }
    }

    fn remove_from(&mut self, key: &str, package: &str) -> bool {
        let removed = self
            .root
            .get_mut(key)
            .and_then(Value::as_object_mut)
            .map(|section| section.shift_remove(package).is_some())
            .unwrap_or(false);
        if removed {
            tracing::debug!(section = key, package, "removed dependency");
        }
        removed
    }

    pub fn remove_dependency(&mut self, package: &str) -> bool {
        self.remove_from(DEPENDENCIES, package)
    }

    pub fn remove_dev_dependency(&mut self, package: &str) -> bool {
        self.remove_from(DEV_DEPENDENCIES, package)
    }

    pub fn add_dependency(&mut self, package: &str, version: &str) {
        tracing::debug!(package, version, "added dependency");
        self.insert_into(DEPENDENCIES, package, version);
    }

    pub fn add_dev_dependency(&mut self, package: &str, version: &str) {
        tracing::debug!(package, version, "added dev dependency");
        self.insert_into(DEV_DEPENDENCIES, package, version);
    }

    pub fn has_dependency(&self, package: &str) -> bool {
        self.section(DEPENDENCIES)
            .map(|s| s.contains_key(package))
            .unwrap_or(false)
    }

    pub fn has_dev_dependency(&self, package: &str) -> bool {
        self.section(DEV_DEPENDENCIES)
            .map(|s| s.contains_key(package))
            .unwrap_or(false)
    }

    pub fn dependency_version(&self, package: &str) -> Option<&str> {
        self.section(DEPENDENCIES)
            .and_then(|s| s.get(package))
            .and_then(Value::as_str)
    }
}

/// Rename the generated packages to `<name>-backend` / `<name>-frontend`
pub fn update_package_names(project_root: &Path, project_name: &str) -> Result<()> {
    for part in ["backend", "frontend"] {
        let path = project_root.join(part).join("package.json");
        if let Some(mut pkg) = PackageJson::load(&path)? {
            pkg.set_name(&format!("{project_name}-{part}"));
            pkg.save()?;
        }
    }
    Ok(())
}

/// A loaded `requirements.txt`
#[derive(Debug, Clone)]
pub struct Requirements {
    path: PathBuf,
    lines: Vec<String>,
}

impl Requirements {
    /// Load `path`, or `None` when it does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        Ok(Some(Self::parse(path, &content)))
    }

    pub fn parse(path: &Path, content: &str) -> Self {
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        while lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
            lines.pop();
        }
        Self {
            path: path.to_path_buf(),
            lines,
        }
    }

    /// Drop every line containing any of `needles`; returns how many went
    pub fn remove_containing(&mut self, needles: &[&str]) -> usize {
        let before = self.lines.len();
        self.lines
            .retain(|line| !needles.iter().any(|needle| line.contains(needle)));
        before - self.lines.len()
    }

    pub fn push(&mut self, requirement: &str) {
        self.lines.push(requirement.to_string());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, self.render())
            .with_context(|| format!("Failed to write: {}", self.path.display()))?;
        Ok(())
    }
}
