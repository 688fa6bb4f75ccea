//! scaffold-core - Shared functionality for create-mern-pro
//!
//! Standard locations, the optional user config file and the thin wrapper
//! around external commands (git, python, package managers).

pub mod config;
pub mod paths;
pub mod process;

pub use config::Config;
pub use paths::Paths;
pub use process::{CommandOutput, ProcessError};
