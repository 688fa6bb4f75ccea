//! End-to-end generation against the bundled templates

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use create_mern_pro::manifest::PackageJson;
use create_mern_pro::model::{
    BackendConfig, BackendRuntime, Database, Feature, FrontendConfig, FrontendFramework, Language,
    Orm, PackageManager, ProjectConfig, ProjectType, PythonFramework,
};
use create_mern_pro::Generator;
use tempfile::{tempdir, TempDir};

fn templates_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

fn generate(config: &ProjectConfig) -> Result<(TempDir, PathBuf)> {
    let out = tempdir()?;
    let dest = out.path().join(&config.project_name);
    Generator::new(templates_root())
        .with_author(Some("Ada Lovelace".to_string()))
        .generate(&dest, config)?;
    Ok((out, dest))
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

fn manifest(path: &Path) -> PackageJson {
    PackageJson::load(path).unwrap().expect("package.json")
}

#[test]
fn default_project_keeps_oauth() -> Result<()> {
    let config = ProjectConfig::defaults("shop", PackageManager::Npm);
    let (_out, dest) = generate(&config)?;

    let backend = manifest(&dest.join("backend/package.json"));
    assert_eq!(backend.name(), Some("shop-backend"));
    assert!(backend.has_dependency("passport"));
    assert!(backend.has_dependency("mongoose"));
    assert_eq!(
        manifest(&dest.join("frontend/package.json")).name(),
        Some("shop-frontend")
    );

    assert!(dest.join("backend/src/config/passport.config.ts").exists());
    assert!(read(&dest.join("backend/src/app.ts")).contains("configurePassport();"));
    assert!(read(&dest.join("frontend/src/pages/public/Login.tsx")).contains("getGoogleAuthUrl"));

    assert!(dest.join(".gitignore").exists());
    assert!(dest.join("backend/.gitignore").exists());
    assert!(dest.join("frontend/.gitignore").exists());
    assert!(!dest.join("backend/gitignore").exists());
    assert!(read(&dest.join("frontend/index.html")).contains("<title>shop</title>"));

    let env = read(&dest.join("backend/.env"));
    assert!(env.contains("MONGODB_URI="));
    assert!(env.contains("GOOGLE_CLIENT_ID="));
    assert!(env.contains("GITHUB_CLIENT_ID="));
    assert_eq!(env, read(&dest.join("backend/.env.example")));
    assert!(read(&dest.join("frontend/.env")).contains("VITE_API_URL="));

    let readme = read(&dest.join("README.md"));
    assert!(readme.starts_with("# shop"));
    assert!(readme.contains("npm install"));
    assert!(!dest.join("docker-compose.yml").exists());
    Ok(())
}

#[test]
fn node_backend_without_oauth_is_stripped() -> Result<()> {
    let mut config = ProjectConfig::defaults("plain", PackageManager::Pnpm);
    config.features = [Feature::JwtAuth].into_iter().collect();
    let (_out, dest) = generate(&config)?;

    let backend = manifest(&dest.join("backend/package.json"));
    assert!(!backend.has_dependency("passport"));
    assert!(!backend.has_dependency("passport-google-oauth20"));
    assert!(!backend.has_dev_dependency("@types/passport"));
    assert!(!dest.join("backend/src/config/passport.config.ts").exists());

    let app = read(&dest.join("backend/src/app.ts"));
    assert!(!app.contains("passport"));
    assert!(app.contains("import { env } from './config/index.js';"));

    let routes = read(&dest.join("backend/src/routes/auth.routes.ts"));
    assert!(!routes.contains("google"));
    assert!(!routes.contains("github"));
    assert!(routes.contains("router.post('/refresh', refreshToken);"));

    let controller = read(&dest.join("backend/src/controllers/auth.controller.ts"));
    assert!(!controller.contains("passport"));
    assert!(!read(&dest.join("backend/src/config/index.ts")).contains("configurePassport"));

    for page in ["Login.tsx", "Signup.tsx"] {
        let source = read(&dest.join("frontend/src/pages/public").join(page));
        assert!(!source.contains("authService"), "{page}");
        assert!(!source.contains("OAuth Buttons"), "{page}");
        assert!(!source.contains("Divider"), "{page}");
        assert!(source.contains("{/* Footer link */}"), "{page}");
    }

    let env = read(&dest.join("backend/.env"));
    assert!(!env.contains("GOOGLE_CLIENT_ID"));
    assert!(!env.contains("GITHUB_CLIENT_ID"));
    Ok(())
}

#[test]
fn javascript_stack_uses_js_sources() -> Result<()> {
    let mut config = ProjectConfig::defaults("jsapp", PackageManager::Yarn);
    config.features.clear();
    config.frontend = Some(FrontendConfig {
        language: Language::JavaScript,
        ..FrontendConfig::default()
    });
    config.backend = Some(BackendConfig {
        runtime: BackendRuntime::NodeJs(Language::JavaScript),
        ..BackendConfig::default()
    });
    let (_out, dest) = generate(&config)?;

    assert!(dest.join("backend/src/app.js").exists());
    assert!(!dest.join("backend/tsconfig.json").exists());
    assert!(!dest.join("backend/src/config/passport.config.js").exists());
    assert!(!read(&dest.join("backend/src/app.js")).contains("passport"));
    assert!(!read(&dest.join("frontend/src/pages/public/Login.jsx")).contains("authService"));
    Ok(())
}

#[test]
fn prisma_on_postgres_writes_schema() -> Result<()> {
    let mut config = ProjectConfig::defaults("store", PackageManager::Npm);
    config.backend = Some(BackendConfig {
        runtime: BackendRuntime::NodeJs(Language::TypeScript),
        database: Database::PostgreSql,
        orm: Orm::Prisma,
    });
    let (_out, dest) = generate(&config)?;

    let backend = manifest(&dest.join("backend/package.json"));
    assert!(backend.has_dependency("@prisma/client"));
    assert!(backend.has_dev_dependency("prisma"));
    assert!(backend.has_dependency("pg"));
    assert!(!backend.has_dependency("mongoose"));

    let schema = read(&dest.join("backend/prisma/schema.prisma"));
    assert!(schema.contains("provider = \"postgresql\""));
    assert!(read(&dest.join("backend/.env")).contains("DATABASE_URL="));
    Ok(())
}

#[test]
fn fastapi_backend_only() -> Result<()> {
    let mut config = ProjectConfig::defaults("api", PackageManager::Npm);
    config.project_type = ProjectType::Backend;
    config.frontend = None;
    config.features = [Feature::GithubOAuth].into_iter().collect();
    config.backend = Some(BackendConfig {
        runtime: BackendRuntime::Python(PythonFramework::FastApi),
        database: Database::MongoDb,
        orm: Orm::MongoEngine,
    });
    let (_out, dest) = generate(&config)?;

    assert!(!dest.join("frontend").exists());
    assert!(dest.join("backend/main.py").exists());

    let requirements = read(&dest.join("backend/requirements.txt"));
    assert!(requirements.contains("mongoengine=="));
    assert!(!requirements.contains("motor=="));
    assert!(requirements.contains("authlib=="));

    let env = read(&dest.join("backend/.env"));
    assert!(env.contains("GITHUB_CLIENT_ID="));
    assert!(!env.contains("GOOGLE_CLIENT_ID="));
    Ok(())
}

#[test]
fn django_without_oauth_drops_allauth() -> Result<()> {
    let mut config = ProjectConfig::defaults("site", PackageManager::Npm);
    config.project_type = ProjectType::Backend;
    config.frontend = None;
    config.features.clear();
    config.backend = Some(BackendConfig {
        runtime: BackendRuntime::Python(PythonFramework::Django),
        database: Database::PostgreSql,
        orm: Orm::SqlAlchemy,
    });
    let (_out, dest) = generate(&config)?;

    assert!(dest.join("backend/manage.py").exists());
    let requirements = read(&dest.join("backend/requirements.txt"));
    assert!(!requirements.contains("django-allauth"));
    assert!(requirements.contains("sqlalchemy=="));
    assert!(requirements.contains("psycopg2-binary=="));
    assert!(!read(&dest.join("backend/.env")).contains("OAuth"));
    Ok(())
}

#[test]
fn vue_frontend_only() -> Result<()> {
    let mut config = ProjectConfig::defaults("panel", PackageManager::Npm);
    config.project_type = ProjectType::Frontend;
    config.backend = None;
    config.frontend = Some(FrontendConfig {
        framework: FrontendFramework::Vue,
        ..FrontendConfig::default()
    });
    let (_out, dest) = generate(&config)?;

    assert!(!dest.join("backend").exists());
    assert!(dest.join("frontend/src/App.vue").exists());
    assert!(read(&dest.join("frontend/.env")).contains("VUE_APP_API_URL="));
    assert_eq!(
        manifest(&dest.join("frontend/package.json")).name(),
        Some("panel-frontend")
    );
    Ok(())
}

#[test]
fn docker_and_swagger() -> Result<()> {
    let mut config = ProjectConfig::defaults("ops", PackageManager::Npm);
    config.features.insert(Feature::Docker);
    config.features.insert(Feature::Swagger);
    let (_out, dest) = generate(&config)?;

    let compose = read(&dest.join("docker-compose.yml"));
    assert!(compose.contains("  mongodb:\n"));
    assert!(compose.contains("  backend:\n"));
    assert!(compose.contains("  frontend:\n"));

    let backend = manifest(&dest.join("backend/package.json"));
    assert!(backend.has_dependency("swagger-ui-express"));
    assert!(backend.has_dev_dependency("@types/swagger-jsdoc"));
    Ok(())
}

#[test]
fn missing_template_fails_cleanly() {
    let mut config = ProjectConfig::defaults("ghost", PackageManager::Npm);
    config.frontend = Some(FrontendConfig {
        framework: FrontendFramework::NextJs,
        language: Language::JavaScript,
        ..FrontendConfig::default()
    });

    let out = tempdir().unwrap();
    let dest = out.path().join("ghost");
    let result = Generator::new(templates_root()).generate(&dest, &config);
    assert!(result.is_err());
    assert!(!dest.exists());
}
