//! create-mern-pro - Full-stack project scaffolding
//!
//! Asks a few questions (or takes the defaults with `--yes`), then generates
//! a frontend/backend project from the bundled templates.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use console::style;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use create_mern_pro::model::PackageManager;
use create_mern_pro::{create_project, prompts, ui, CliOptions, CreateOptions, DialoguerPrompter, Generator};
use scaffold_core::{Config, Paths};

#[derive(Parser)]
#[command(name = "create-mern-pro")]
#[command(about = "Create production-ready full-stack applications from templates")]
#[command(version)]
#[command(group(ArgGroup::new("package-manager").args(["npm", "yarn", "pnpm"])))]
#[command(after_help = r#"STACKS:
    Frontend   React (TS/JS), Vue, Next.js
    Backend    Node.js Express (TS/JS), Python FastAPI, Python Django
    Database   MongoDB, PostgreSQL, MySQL, SQLite

TEMPLATE VARIABLES:
    {{NAME}}          Project name
    {{PROJECT_NAME}}  Project name
    {{AUTHOR}}        Author (config, git user.name or $USER)
    {{DATE}}          Current date (YYYY-MM-DD)
    {{YEAR}}          Current year

CONFIGURATION:
    ~/.config/create-mern-pro/config.json may set package_manager,
    templates_dir, init_git, install_deps and author.
    CREATE_MERN_PRO_TEMPLATES overrides the templates directory.

EXAMPLES:
    create-mern-pro                         # Interactive
    create-mern-pro shop -y                 # Defaults: React + Express + MongoDB
    create-mern-pro shop --pnpm --skip-install
    create-mern-pro shop -y --force         # Replace an existing ./shop
"#)]
struct Cli {
    /// Name of the project (letters, digits, '-' and '_'; starts with a letter)
    project_name: Option<String>,

    /// Skip prompts and use defaults
    #[arg(short, long)]
    yes: bool,

    /// Use npm as package manager
    #[arg(long)]
    npm: bool,

    /// Use yarn as package manager
    #[arg(long)]
    yarn: bool,

    /// Use pnpm as package manager
    #[arg(long)]
    pnpm: bool,

    /// Skip dependency installation
    #[arg(long)]
    skip_install: bool,

    /// Don't initialize a git repository
    #[arg(long)]
    no_git: bool,

    /// Overwrite an existing project directory
    #[arg(long)]
    force: bool,

    /// Templates directory to use instead of the bundled one
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn package_manager(&self) -> Option<PackageManager> {
        if self.npm {
            Some(PackageManager::Npm)
        } else if self.yarn {
            Some(PackageManager::Yarn)
        } else if self.pnpm {
            Some(PackageManager::Pnpm)
        } else {
            None
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", style("Error:").red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    ui::print_banner();

    let user_config = Config::load()?;
    let bundled = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates");
    let templates_root = Paths::templates_root(
        cli.templates.as_deref(),
        user_config.templates_dir.as_deref(),
        &bundled,
    );
    tracing::debug!(path = %templates_root.display(), "templates root");

    let options = CliOptions {
        yes: cli.yes,
        package_manager: cli.package_manager(),
        skip_install: cli.skip_install,
        no_git: cli.no_git,
    };

    let config = prompts::collect(
        cli.project_name.as_deref(),
        &options,
        &user_config,
        &DialoguerPrompter::new(),
    )?;

    let generator = Generator::new(templates_root).with_author(user_config.author.clone());
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;

    create_project(
        &config,
        &generator,
        &CreateOptions {
            cwd,
            force: cli.force,
        },
    )?;

    Ok(())
}
