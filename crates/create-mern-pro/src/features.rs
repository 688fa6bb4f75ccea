//! Conditional feature handling
//!
//! Templates ship with every optional feature wired in. When a feature is
//! not selected its code is cut out of the copied files; when an additive
//! feature is selected its packages and files are added.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::manifest::{PackageJson, Requirements};
use crate::model::{
    BackendRuntime, Database, Feature, FrontendFramework, Language, ProjectConfig, PythonFramework,
};
use crate::patch::SourceFile;

/// Passport packages in a Node backend manifest
const PASSPORT_DEPENDENCIES: &[&str] = &["passport", "passport-google-oauth20", "passport-github2"];
const PASSPORT_DEV_DEPENDENCIES: &[&str] = &[
    "@types/passport",
    "@types/passport-google-oauth20",
    "@types/passport-github2",
];

/// OAuth handler names imported by the auth routes
const OAUTH_HANDLERS: &[&str] = &[
    "googleAuth",
    "googleAuthCallback",
    "googleCallback",
    "githubAuth",
    "githubAuthCallback",
    "githubCallback",
];

const PASSPORT_IMPORT: &str = "import passport from 'passport';\n";
const PASSPORT_HANDLERS_MARKER: &str = "// Passport authentication handlers";
const PASSPORT_INIT_BLOCK: &str =
    "// Passport initialization\napp.use(passport.initialize());\nconfigurePassport();\n\n";
const PASSPORT_CONFIG_MODULE: &str = "./passport.config";
const GOOGLE_ROUTES: &str = "// OAuth routes - Google\nrouter.get('/google', googleAuth);\nrouter.get('/google/callback', googleAuthCallback, googleCallback);\n\n";
const GITHUB_ROUTES: &str = "// OAuth routes - GitHub\nrouter.get('/github', githubAuth);\nrouter.get('/github/callback', githubAuthCallback, githubCallback);\n\n";

const AUTH_SERVICE_IMPORT: &str = "import { authService } from '@/services/auth.service';\n";
const DIVIDER_MARKER: &str = "{/* Divider */}";
const OAUTH_BUTTONS_MARKER: &str = "{/* OAuth Buttons */}";

/// Apply every conditional feature to the generated project
pub fn apply(project_root: &Path, config: &ProjectConfig) -> Result<()> {
    let has_oauth = config.has_oauth();
    let backend_dir = project_root.join("backend");
    let frontend_dir = project_root.join("frontend");

    if let Some(backend) = &config.backend {
        match backend.runtime {
            BackendRuntime::NodeJs(language) => {
                if !has_oauth {
                    strip_node_oauth(&backend_dir, language)
                        .context("Failed to remove OAuth from the Node.js backend")?;
                }
                if config.has_feature(Feature::Swagger) {
                    add_node_swagger(&backend_dir, language)?;
                }
            }
            BackendRuntime::Python(framework) => {
                if !has_oauth {
                    strip_python_oauth(&backend_dir, framework)
                        .context("Failed to remove OAuth from the Python backend")?;
                }
            }
        }
    }

    if let Some(frontend) = &config.frontend {
        if !has_oauth {
            strip_frontend_oauth(&frontend_dir, frontend.framework)
                .context("Failed to remove OAuth from the frontend")?;
        }
    }

    if config.has_feature(Feature::Docker) {
        write_docker_compose(project_root, config)?;
    }

    Ok(())
}

/// Source extension for the Node template language
fn node_ext(language: Language) -> &'static str {
    match language {
        Language::TypeScript => "ts",
        Language::JavaScript => "js",
    }
}

/// Remove passport and the OAuth routes/handlers from a Node backend
pub fn strip_node_oauth(backend_dir: &Path, language: Language) -> Result<()> {
    let ext = node_ext(language);

    if let Some(mut pkg) = PackageJson::load(&backend_dir.join("package.json"))? {
        for dep in PASSPORT_DEPENDENCIES {
            pkg.remove_dependency(dep);
        }
        for dep in PASSPORT_DEV_DEPENDENCIES {
            pkg.remove_dev_dependency(dep);
        }
        pkg.save()?;
    }

    let passport_config = backend_dir.join(format!("src/config/passport.config.{ext}"));
    if passport_config.is_file() {
        fs::remove_file(&passport_config)
            .with_context(|| format!("Failed to remove {}", passport_config.display()))?;
        tracing::debug!(path = %passport_config.display(), "removed passport config");
    }

    if let Some(mut index) = SourceFile::open(&backend_dir.join(format!("src/config/index.{ext}")))? {
        index.retain_lines(|line| !line.contains(PASSPORT_CONFIG_MODULE));
        index.save()?;
    }

    if let Some(mut app) = SourceFile::open(&backend_dir.join(format!("src/app.{ext}")))? {
        app.remove_first(PASSPORT_IMPORT);
        app.remove_first(", configurePassport");
        app.remove_first(PASSPORT_INIT_BLOCK);
        app.save()?;
    }

    let routes_path = backend_dir.join(format!("src/routes/auth.routes.{ext}"));
    if let Some(mut routes) = SourceFile::open(&routes_path)? {
        for handler in OAUTH_HANDLERS {
            routes.remove_first(&format!("    {handler},\n"));
        }
        routes.remove_first(GOOGLE_ROUTES);
        routes.remove_first(GITHUB_ROUTES);
        routes.save()?;
    }

    let controller_path = backend_dir.join(format!("src/controllers/auth.controller.{ext}"));
    if let Some(mut controller) = SourceFile::open(&controller_path)? {
        controller.remove_first(PASSPORT_IMPORT);
        controller.truncate_from(PASSPORT_HANDLERS_MARKER);
        controller.save()?;
    }

    tracing::info!("removed OAuth from Node.js backend");
    Ok(())
}

/// Drop the OAuth library from a Python backend's requirements
pub fn strip_python_oauth(backend_dir: &Path, framework: PythonFramework) -> Result<()> {
    let marker = match framework {
        PythonFramework::FastApi => "authlib",
        PythonFramework::Django => "django-allauth",
    };

    if let Some(mut requirements) = Requirements::load(&backend_dir.join("requirements.txt"))? {
        if requirements.remove_containing(&[marker]) > 0 {
            requirements.save()?;
            tracing::info!(package = marker, "removed OAuth from Python backend");
        }
    }
    Ok(())
}

/// Remove the OAuth buttons from the login and signup pages
pub fn strip_frontend_oauth(frontend_dir: &Path, framework: FrontendFramework) -> Result<()> {
    match framework {
        FrontendFramework::React => {
            let pages = frontend_dir.join("src/pages/public");
            for page in ["Login.tsx", "Signup.tsx", "Login.jsx", "Signup.jsx"] {
                if let Some(mut file) = SourceFile::open(&pages.join(page))? {
                    file.remove_first(AUTH_SERVICE_IMPORT);
                    file.remove_block(DIVIDER_MARKER, OAUTH_BUTTONS_MARKER);
                    file.save()?;
                }
            }
            tracing::info!("removed OAuth buttons from React pages");
        }
        FrontendFramework::Vue | FrontendFramework::NextJs => {
            tracing::debug!(framework = framework.label(), "no OAuth rules for frontend framework");
        }
    }
    Ok(())
}

/// Add swagger-ui-express and swagger-jsdoc to a Node backend
pub fn add_node_swagger(backend_dir: &Path, language: Language) -> Result<()> {
    let Some(mut pkg) = PackageJson::load(&backend_dir.join("package.json"))? else {
        return Ok(());
    };

    pkg.add_dependency("swagger-ui-express", "^5.0.0");
    pkg.add_dependency("swagger-jsdoc", "^6.2.8");
    if language == Language::TypeScript {
        pkg.add_dev_dependency("@types/swagger-ui-express", "^4.1.6");
        pkg.add_dev_dependency("@types/swagger-jsdoc", "^6.0.4");
    }
    pkg.save()?;

    tracing::info!("added Swagger packages to Node.js backend");
    Ok(())
}

/// Database service block for docker-compose, if the database runs as a service
fn database_service(database: Database) -> Option<&'static str> {
    match database {
        Database::MongoDb => Some(
            "  mongodb:
    image: mongo:7
    ports:
      - \"27017:27017\"
    volumes:
      - db-data:/data/db
",
        ),
        Database::PostgreSql => Some(
            "  postgres:
    image: postgres:16
    environment:
      POSTGRES_USER: user
      POSTGRES_PASSWORD: password
      POSTGRES_DB: dbname
    ports:
      - \"5432:5432\"
    volumes:
      - db-data:/var/lib/postgresql/data
",
        ),
        Database::MySql => Some(
            "  mysql:
    image: mysql:8
    environment:
      MYSQL_USER: user
      MYSQL_PASSWORD: password
      MYSQL_DATABASE: dbname
      MYSQL_ROOT_PASSWORD: password
    ports:
      - \"3306:3306\"
    volumes:
      - db-data:/var/lib/mysql
",
        ),
        Database::Sqlite => None,
    }
}

/// Render the root docker-compose.yml
pub fn docker_compose(config: &ProjectConfig) -> String {
    let mut out = String::from("services:\n");
    let db_service = config
        .backend
        .as_ref()
        .and_then(|b| database_service(b.database));

    if let Some(service) = db_service {
        out.push_str(service);
        out.push('\n');
    }

    if let Some(backend) = &config.backend {
        out.push_str("  backend:\n    build: ./backend\n    env_file: ./backend/.env\n");
        let port = match backend.runtime {
            BackendRuntime::NodeJs(_) => "8080:8080",
            BackendRuntime::Python(_) => "8000:8000",
        };
        out.push_str(&format!("    ports:\n      - \"{port}\"\n"));
        if let Some(name) = db_service.and_then(|s| s.trim().split(':').next()) {
            out.push_str(&format!("    depends_on:\n      - {name}\n"));
        }
        out.push('\n');
    }

    if config.frontend.is_some() {
        out.push_str("  frontend:\n    build: ./frontend\n    ports:\n      - \"5173:5173\"\n");
        if config.backend.is_some() {
            out.push_str("    depends_on:\n      - backend\n");
        }
        out.push('\n');
    }

    if db_service.is_some() {
        out.push_str("volumes:\n  db-data:\n");
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn write_docker_compose(project_root: &Path, config: &ProjectConfig) -> Result<()> {
    let path = project_root.join("docker-compose.yml");
    fs::write(&path, docker_compose(config))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("wrote docker-compose.yml");
    Ok(())
}
