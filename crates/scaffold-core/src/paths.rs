//! Standard paths used by create-mern-pro

use std::path::{Path, PathBuf};

/// Application directory name under the platform config/data dirs
pub const APP_DIR: &str = "create-mern-pro";

/// Environment variable that points at a templates root
pub const TEMPLATES_ENV: &str = "CREATE_MERN_PRO_TEMPLATES";

/// Standard create-mern-pro paths
pub struct Paths {
    /// Config directory (~/.config/create-mern-pro)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR);

        Self { config }
    }

    /// Path of the user config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Templates installed next to the executable (`<prefix>/share/create-mern-pro/templates`)
    pub fn installed_templates() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        let candidate = exe.parent()?.join("../share").join(APP_DIR).join("templates");
        candidate.is_dir().then_some(candidate)
    }

    /// Pick the templates root.
    ///
    /// Order: explicit flag, `CREATE_MERN_PRO_TEMPLATES`, the user config,
    /// the install prefix, then `fallback` (the source checkout).
    pub fn templates_root(
        flag: Option<&Path>,
        configured: Option<&Path>,
        fallback: &Path,
    ) -> PathBuf {
        if let Some(dir) = flag {
            return dir.to_path_buf();
        }

        if let Ok(dir) = std::env::var(TEMPLATES_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }

        if let Some(dir) = configured {
            return dir.to_path_buf();
        }

        Self::installed_templates().unwrap_or_else(|| fallback.to_path_buf())
    }
}
