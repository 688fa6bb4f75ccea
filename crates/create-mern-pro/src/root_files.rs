//! Root-level `.gitignore` and `README.md`

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::model::{BackendRuntime, Feature, ProjectConfig};

pub const ROOT_GITIGNORE: &str = "# Dependencies
node_modules/
.pnp
.pnp.js

# Python
__pycache__/
*.py[cod]
*$py.class
*.so
.Python
venv/
env/
ENV/

# Build outputs
dist/
build/

# Environment files
.env
.env.local
.env.*.local

# Logs
logs/
*.log
npm-debug.log*
yarn-debug.log*
yarn-error.log*
pnpm-debug.log*

# Editor directories
.idea/
.vscode/
*.swp
*.swo

# OS files
.DS_Store
Thumbs.db

# Testing
coverage/

# Misc
*.pem
";

/// Security features listed in the README, in display order
const SECURITY_FEATURES: &[(Feature, &str)] = &[
    (Feature::JwtAuth, "JWT Authentication with access/refresh tokens"),
    (Feature::GoogleOAuth, "OAuth integration (Google)"),
    (Feature::GithubOAuth, "OAuth integration (GitHub)"),
    (Feature::EmailVerification, "Email verification flow"),
    (Feature::PasswordReset, "Password reset functionality"),
    (Feature::Rbac, "Role-based access control"),
    (Feature::RateLimiting, "API rate limiting"),
    (Feature::AuditLogging, "Audit logging"),
];

pub fn write_root_files(project_root: &Path, config: &ProjectConfig) -> Result<()> {
    let gitignore = project_root.join(".gitignore");
    fs::write(&gitignore, ROOT_GITIGNORE)
        .with_context(|| format!("Failed to write {}", gitignore.display()))?;

    let readme = project_root.join("README.md");
    fs::write(&readme, render_readme(config))
        .with_context(|| format!("Failed to write {}", readme.display()))?;

    tracing::debug!("wrote root .gitignore and README.md");
    Ok(())
}

/// Render the project README from the configuration
pub fn render_readme(config: &ProjectConfig) -> String {
    let name = &config.project_name;
    let pm = config.package_manager;
    let mut out = String::new();

    let _ = writeln!(out, "# {name}\n");
    out.push_str("A production-ready full-stack application with security best practices.\n\n");

    // Tech stack
    out.push_str("## Tech Stack\n\n");
    if let Some(frontend) = &config.frontend {
        out.push_str("### Frontend\n");
        let _ = writeln!(out, "- **Framework**: {}", frontend.framework.label());
        let _ = writeln!(out, "- **Language**: {}", frontend.language.label());
        let _ = writeln!(out, "- **Styling**: {}", frontend.styling.label());
        let _ = writeln!(out, "- **State Management**: {}\n", frontend.state_management.label());
    }
    if let Some(backend) = &config.backend {
        out.push_str("### Backend\n");
        let (runtime, language) = match backend.runtime {
            BackendRuntime::NodeJs(language) => ("Node.js (Express)".to_string(), language.label()),
            BackendRuntime::Python(framework) => (format!("Python ({})", framework.label()), "Python"),
        };
        let _ = writeln!(out, "- **Runtime**: {runtime}");
        let _ = writeln!(out, "- **Database**: {}", backend.database.label());
        let _ = writeln!(out, "- **ORM/ODM**: {}", backend.orm.label());
        let _ = writeln!(out, "- **Language**: {language}\n");
    }

    // Structure
    out.push_str("## Project Structure\n\n```\n");
    let _ = writeln!(out, "{name}/");
    if let Some(frontend) = &config.frontend {
        let _ = writeln!(out, "├── frontend/           # {} application", frontend.framework.label());
        out.push_str("│   ├── src/\n│   └── package.json\n");
    }
    if let Some(backend) = &config.backend {
        let _ = writeln!(out, "├── backend/            # {} backend", backend.runtime.label());
        if backend.runtime.is_python() {
            out.push_str("│   ├── app/\n│   └── requirements.txt\n");
        } else {
            out.push_str("│   ├── src/\n│   └── package.json\n");
        }
    }
    out.push_str("└── README.md\n```\n\n");

    // Getting started
    out.push_str("## Getting Started\n\n### Prerequisites\n\n");
    if config.frontend.is_some() || config.is_node_backend() {
        out.push_str("- Node.js 18+\n");
    }
    if config.is_python_backend() {
        out.push_str("- Python 3.10+\n");
    }
    if let Some(backend) = &config.backend {
        let _ = writeln!(out, "- {} database", backend.database.label());
    }
    out.push_str("\n### Installation\n\n");

    let mut step = 1;
    if let Some(backend) = &config.backend {
        match backend.runtime {
            BackendRuntime::Python(framework) => {
                let _ = write!(
                    out,
                    "{step}. **Set up Python backend:**

   ```bash
   cd backend
   python -m venv venv
   source venv/bin/activate  # On Windows: venv\\Scripts\\activate
   pip install -r requirements.txt
   cp .env.example .env
   # Edit .env with your configuration
   ```

{next}. **Start the backend:**

   ```bash
   {dev}
   ```

",
                    next = step + 1,
                    dev = framework.dev_command(),
                );
            }
            BackendRuntime::NodeJs(_) => {
                let _ = write!(
                    out,
                    "{step}. **Set up Node.js backend:**

   ```bash
   cd backend
   {pm} install
   cp .env.example .env
   # Edit .env with your configuration
   ```

{next}. **Start the backend:**

   ```bash
   {run} dev
   ```

",
                    next = step + 1,
                    pm = pm.command(),
                    run = pm.run_prefix(),
                );
            }
        }
        step += 2;
    }
    if config.frontend.is_some() {
        let _ = write!(
            out,
            "{step}. **Set up frontend:**

   ```bash
   cd frontend
   {pm} install
   cp .env.example .env
   ```

{next}. **Start the frontend:**

   ```bash
   {run} dev
   ```

",
            next = step + 1,
            pm = pm.command(),
            run = pm.run_prefix(),
        );
    }

    // Security
    let security: Vec<&str> = SECURITY_FEATURES
        .iter()
        .filter(|(feature, _)| config.has_feature(*feature))
        .map(|(_, line)| *line)
        .collect();
    if !security.is_empty() {
        out.push_str("## Security Features\n\n");
        for line in security {
            let _ = writeln!(out, "- {line}");
        }
        out.push('\n');
    }

    out.push_str("## License\n\nMIT\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BackendConfig, Database, Orm, PackageManager, ProjectType, PythonFramework,
    };
    use tempfile::tempdir;

    #[test]
    fn test_readme_full_stack_with_pnpm() {
        let mut config = ProjectConfig::defaults("shop", PackageManager::Pnpm);
        config.features.insert(Feature::JwtAuth);
        config.features.remove(&Feature::GithubOAuth);

        let readme = render_readme(&config);
        assert!(readme.starts_with("# shop\n\n"));
        assert!(readme.contains("- **Framework**: React\n"));
        assert!(readme.contains("- **Runtime**: Node.js (Express)\n"));
        assert!(readme.contains("shop/\n├── frontend/"));
        assert!(readme.contains("1. **Set up Node.js backend:**"));
        assert!(readme.contains("3. **Set up frontend:**"));
        assert!(readme.contains("   pnpm install\n"));
        assert!(readme.contains("   pnpm dev\n"));
        assert!(!readme.contains("npm run"));
        assert!(readme.contains("- JWT Authentication with access/refresh tokens\n- OAuth integration (Google)\n- Email verification flow\n"));
        assert!(!readme.contains("GitHub)"));
        assert!(readme.ends_with("## License\n\nMIT\n"));
    }

    #[test]
    fn test_readme_python_backend_only() {
        let mut config = ProjectConfig::defaults("api", PackageManager::Npm);
        config.project_type = ProjectType::Backend;
        config.frontend = None;
        config.features.clear();
        config.backend = Some(BackendConfig {
            runtime: BackendRuntime::Python(PythonFramework::Django),
            database: Database::PostgreSql,
            orm: Orm::SqlAlchemy,
        });

        let readme = render_readme(&config);
        assert!(!readme.contains("### Frontend"));
        assert!(readme.contains("- Python 3.10+\n- PostgreSQL database\n"));
        assert!(!readme.contains("Node.js 18+"));
        assert!(readme.contains("│   └── requirements.txt\n"));
        assert!(readme.contains("   python manage.py runserver\n"));
        assert!(!readme.contains("3. **Set up frontend"));
        assert!(!readme.contains("## Security Features"));
    }

    #[test]
    fn test_write_root_files() -> Result<()> {
        let dir = tempdir()?;
        let config = ProjectConfig::defaults("app", PackageManager::Yarn);
        write_root_files(dir.path(), &config)?;

        assert_eq!(fs::read_to_string(dir.path().join(".gitignore"))?, ROOT_GITIGNORE);
        let readme = fs::read_to_string(dir.path().join("README.md"))?;
        assert!(readme.contains("   yarn dev\n"));
        Ok(())
    }
}
