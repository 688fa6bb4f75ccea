//! Template variable handling
//!
//! Copied template files may contain `{{PLACEHOLDER}}` markers. They are
//! replaced in file content and in file/directory names; unknown markers are
//! left alone so JSX and template-engine syntax passes through untouched.

use chrono::Local;
use regex::Regex;
use std::collections::HashMap;
use std::process::Command;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_][A-Z0-9_]*)\}\}").expect("placeholder pattern is valid"));

/// Template variables container
#[derive(Debug, Clone)]
pub struct Variables {
    vars: HashMap<String, String>,
}

impl Variables {
    /// Standard variables for a project
    pub fn new(project_name: &str, author: Option<&str>) -> Self {
        let now = Local::now();
        let author = author
            .map(str::to_string)
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(Self::detect_author);

        let mut vars = HashMap::new();
        vars.insert("NAME".to_string(), project_name.to_string());
        vars.insert("PROJECT_NAME".to_string(), project_name.to_string());
        vars.insert("AUTHOR".to_string(), author);
        vars.insert("DATE".to_string(), now.format("%Y-%m-%d").to_string());
        vars.insert("YEAR".to_string(), now.format("%Y").to_string());

        Self { vars }
    }

    /// Author name from git config, falling back to $USER
    fn detect_author() -> String {
        if let Ok(output) = Command::new("git").args(["config", "user.name"]).output() {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
    }

    /// Replace all known `{{PLACEHOLDER}}` markers
    pub fn substitute(&self, content: &str) -> String {
        PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let key = &caps[1];
                self.vars
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .to_string()
    }
}

/// Check if a file is likely binary (no substitution)
pub fn is_binary_file(content: &[u8]) -> bool {
    // Null bytes in the first 8KB
    let check_len = content.len().min(8192);
    content[..check_len].contains(&0)
}
