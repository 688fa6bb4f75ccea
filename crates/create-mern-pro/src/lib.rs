//! create-mern-pro - Full-stack project scaffolding
//!
//! Copies a frontend and/or backend template into a new directory, cuts out
//! the features that were not selected, wires the chosen ORM into the
//! backend manifest and writes env files, a README and a root `.gitignore`.
//! Git, a Python virtualenv and the JS package install run afterwards.
//!
//! It is still "copy directory, replace placeholders", plus a set of text
//! and manifest edits that know the template boilerplate.

pub mod env_files;
pub mod error;
pub mod features;
pub mod manifest;
pub mod model;
pub mod orm;
pub mod patch;
pub mod project;
pub mod prompts;
pub mod root_files;
pub mod setup;
pub mod templates;
pub mod ui;
pub mod variables;

pub use error::ScaffoldError;
pub use model::ProjectConfig;
pub use project::{create_project, CreateOptions, Generator};
pub use prompts::{CliOptions, DialoguerPrompter, Prompter};
pub use variables::Variables;
