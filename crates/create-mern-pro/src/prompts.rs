//! Interactive configuration collection
//!
//! The questions are asked through the [`Prompter`] trait so the flow can be
//! driven by a script in tests. [`DialoguerPrompter`] is the terminal
//! implementation.

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use scaffold_core::Config;

use crate::model::{
    is_valid_project_name, BackendConfig, BackendRuntime, Database, Feature, FrontendConfig,
    FrontendFramework, Language, Orm, PackageManager, ProjectConfig, ProjectType, PythonFramework,
    StateManagement, Styling, DEFAULT_PROJECT_NAME,
};

const INVALID_NAME_HINT: &str =
    "Project name must start with a letter and contain only letters, numbers, hyphens, and underscores";

/// Question primitives used to build a configuration
pub trait Prompter {
    /// Free text with a default, re-asked until `validate` accepts it
    fn input(
        &self,
        prompt: &str,
        default: &str,
        validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String>;

    /// One item out of `items`; returns its index
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Any number of items; `checked` gives the initial state of each
    fn multi_select(&self, prompt: &str, items: &[&str], checked: &[bool]) -> Result<Vec<usize>>;

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Terminal prompts rendered with dialoguer
#[derive(Default)]
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(
        &self,
        prompt: &str,
        default: &str,
        validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .validate_with(|input: &String| validate(input))
            .interact_text()?;
        Ok(value)
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?;
        Ok(selection)
    }

    fn multi_select(&self, prompt: &str, items: &[&str], checked: &[bool]) -> Result<Vec<usize>> {
        let selection = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .defaults(checked)
            .interact()?;
        Ok(selection)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(answer)
    }
}

/// Command-line switches that shape the questions
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    /// Skip every prompt and take the defaults
    pub yes: bool,
    pub package_manager: Option<PackageManager>,
    pub skip_install: bool,
    pub no_git: bool,
}

fn validate_name_input(input: &str) -> Result<(), String> {
    if is_valid_project_name(input) {
        Ok(())
    } else {
        Err(INVALID_NAME_HINT.to_string())
    }
}

/// Pick one value out of `choices` by label
fn choose<T: Copy>(
    prompter: &dyn Prompter,
    prompt: &str,
    choices: &[T],
    label: impl Fn(&T) -> String,
    default: usize,
) -> Result<T> {
    let labels: Vec<String> = choices.iter().map(&label).collect();
    let items: Vec<&str> = labels.iter().map(String::as_str).collect();
    let index = prompter.select(prompt, &items, default)?;
    Ok(choices.get(index).copied().unwrap_or(choices[default]))
}

/// Build a validated [`ProjectConfig`] from arguments, user config and answers
pub fn collect(
    name_arg: Option<&str>,
    options: &CliOptions,
    user_config: &Config,
    prompter: &dyn Prompter,
) -> Result<ProjectConfig> {
    let project_name = match name_arg {
        Some(name) => name.to_string(),
        None if options.yes => DEFAULT_PROJECT_NAME.to_string(),
        None => prompter.input(
            "What is your project name?",
            DEFAULT_PROJECT_NAME,
            &validate_name_input,
        )?,
    };

    let configured_pm = user_config
        .package_manager
        .as_deref()
        .and_then(PackageManager::from_name)
        .unwrap_or(PackageManager::Npm);

    let package_manager = match options.package_manager {
        Some(pm) => pm,
        None if options.yes => configured_pm,
        None => {
            let default = PackageManager::ALL
                .iter()
                .position(|pm| *pm == configured_pm)
                .unwrap_or(0);
            choose(
                prompter,
                "Which package manager would you like to use?",
                &PackageManager::ALL,
                |pm| pm.command().to_string(),
                default,
            )?
        }
    };

    let mut config = if options.yes {
        let mut config = ProjectConfig::defaults(&project_name, package_manager);
        config.init_git = user_config.init_git;
        config.install_deps = user_config.install_deps;
        config
    } else {
        ask_stack(&project_name, package_manager, user_config, options, prompter)?
    };

    if options.no_git {
        config.init_git = false;
    }
    if options.skip_install {
        config.install_deps = false;
    }

    config.validate()?;
    tracing::debug!(?config, "collected project configuration");
    Ok(config)
}

fn ask_stack(
    project_name: &str,
    package_manager: PackageManager,
    user_config: &Config,
    options: &CliOptions,
    prompter: &dyn Prompter,
) -> Result<ProjectConfig> {
    let project_type = choose(
        prompter,
        "What type of project?",
        &ProjectType::ALL,
        |t| t.label().to_string(),
        0,
    )?;

    let frontend = if project_type.has_frontend() {
        Some(ask_frontend(prompter)?)
    } else {
        None
    };

    let backend = if project_type.has_backend() {
        Some(ask_backend(prompter)?)
    } else {
        None
    };

    let labels: Vec<&str> = Feature::ALL.iter().map(Feature::label).collect();
    let defaults = Feature::defaults();
    let checked: Vec<bool> = Feature::ALL.iter().map(|f| defaults.contains(f)).collect();
    let features = prompter
        .multi_select("Select additional features:", &labels, &checked)?
        .into_iter()
        .filter_map(|i| Feature::ALL.get(i).copied())
        .collect();

    let init_git = if options.no_git {
        false
    } else {
        prompter.confirm("Initialize a git repository?", user_config.init_git)?
    };

    let install_deps = if options.skip_install {
        false
    } else {
        prompter.confirm("Install dependencies after creation?", user_config.install_deps)?
    };

    Ok(ProjectConfig {
        project_name: project_name.to_string(),
        package_manager,
        project_type,
        frontend,
        backend,
        features,
        init_git,
        install_deps,
    })
}

fn ask_frontend(prompter: &dyn Prompter) -> Result<FrontendConfig> {
    let framework = choose(
        prompter,
        "Frontend framework:",
        &FrontendFramework::ALL,
        |f| f.label().to_string(),
        0,
    )?;

    // Vue and Next.js ship TypeScript templates only
    let language = match framework {
        FrontendFramework::React => choose(
            prompter,
            "Frontend language:",
            &Language::ALL,
            |l| l.label().to_string(),
            0,
        )?,
        FrontendFramework::Vue | FrontendFramework::NextJs => Language::TypeScript,
    };

    let styling = choose(
        prompter,
        "Styling:",
        &Styling::ALL,
        |s| s.label().to_string(),
        0,
    )?;

    let state_management = choose(
        prompter,
        "State management:",
        &StateManagement::ALL,
        |s| s.label().to_string(),
        0,
    )?;

    Ok(FrontendConfig {
        framework,
        language,
        styling,
        state_management,
    })
}

fn ask_backend(prompter: &dyn Prompter) -> Result<BackendConfig> {
    let runtime = match prompter.select("Backend runtime:", &["Node.js (Express)", "Python"], 0)? {
        1 => BackendRuntime::Python(choose(
            prompter,
            "Python framework:",
            &PythonFramework::ALL,
            |f| f.label().to_string(),
            0,
        )?),
        _ => BackendRuntime::NodeJs(choose(
            prompter,
            "Backend language:",
            &Language::ALL,
            |l| l.label().to_string(),
            0,
        )?),
    };

    let database = choose(
        prompter,
        "Database:",
        &Database::ALL,
        |d| d.label().to_string(),
        0,
    )?;

    let orms = Orm::choices_for(&runtime, database);
    let orm = match orms {
        [only] => *only,
        _ => choose(prompter, "ORM/ODM:", orms, |o| o.label().to_string(), 0)?,
    };

    Ok(BackendConfig {
        runtime,
        database,
        orm,
    })
}
