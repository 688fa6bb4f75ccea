//! Terminal output: banner, spinners, summary and next steps

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::model::{BackendRuntime, Feature, ProjectConfig};

const DOCS_URL: &str = "https://github.com/ROOP420/MERN_SETUP";

/// One spinner-backed step of the generation pipeline
pub struct Step {
    pb: ProgressBar,
}

impl Step {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        Self { pb }
    }

    pub fn succeed(self, message: &str) {
        self.pb.finish_and_clear();
        eprintln!("{} {}", style("✔").green(), message);
    }

    pub fn warn(self, message: &str) {
        self.pb.finish_and_clear();
        eprintln!("{} {}", style("⚠").yellow(), style(message).yellow());
    }

    pub fn fail(self, message: &str) {
        self.pb.finish_and_clear();
        eprintln!("{} {}", style("✖").red(), style(message).red());
    }
}

pub fn print_banner() {
    println!();
    println!(
        "  {} {}",
        style("🚀").bold(),
        style("Create MERN Pro").bold().cyan()
    );
    println!(
        "  {}",
        style("Production-ready full-stack projects from templates").dim()
    );
    println!();
}

pub fn print_summary(config: &ProjectConfig) {
    println!();
    println!("  {} {}", style("Project: ").cyan(), config.project_name);
    println!("  {} {}", style("Type:    ").cyan(), config.project_type.label());

    if let Some(frontend) = &config.frontend {
        println!(
            "  {} {} ({})",
            style("Frontend:").cyan(),
            frontend.framework.label(),
            frontend.language.label()
        );
    }

    if let Some(backend) = &config.backend {
        println!("  {} {}", style("Backend: ").cyan(), backend.runtime.label());
        println!(
            "  {} {} + {}",
            style("Database:").cyan(),
            backend.database.label(),
            backend.orm.label()
        );
    }

    let features: Vec<&str> = config.features.iter().map(Feature::as_str).collect();
    let features = if features.is_empty() {
        "none".to_string()
    } else {
        features.join(", ")
    };
    println!("  {} {}", style("Features:").cyan(), features);
    println!();
}

/// Lines of the "next steps" section, without styling
pub fn next_steps(config: &ProjectConfig) -> Vec<String> {
    let run = config.package_manager.run_prefix();
    let mut lines = vec![format!("1. cd {}", config.project_name)];

    let mut env_notes = Vec::new();
    if let Some(backend) = &config.backend {
        env_notes.push(format!(
            "Update backend/.env with your {} configuration",
            backend.database.label()
        ));
    }
    if config.has_oauth() {
        env_notes.push("Add your OAuth credentials".to_string());
    }
    if config.has_feature(Feature::EmailVerification) || config.has_feature(Feature::PasswordReset) {
        env_notes.push("Configure SMTP for email services".to_string());
    }
    if !env_notes.is_empty() {
        lines.push("2. Configure your environment variables:".to_string());
        lines.extend(env_notes.into_iter().map(|note| format!("   • {note}")));
    }

    lines.push("3. Start the development servers:".to_string());
    if let Some(backend) = &config.backend {
        lines.push("   Backend:".to_string());
        match backend.runtime {
            BackendRuntime::Python(framework) => {
                lines.push("     cd backend".to_string());
                lines.push(
                    "     source venv/bin/activate  # On Windows: venv\\Scripts\\activate".to_string(),
                );
                lines.push("     pip install -r requirements.txt".to_string());
                lines.push(format!("     {}", framework.dev_command()));
            }
            BackendRuntime::NodeJs(_) => lines.push(format!("     cd backend && {run} dev")),
        }
    }
    if config.frontend.is_some() {
        lines.push("   Frontend:".to_string());
        lines.push(format!("     cd frontend && {run} dev"));
    }
    lines
}

pub fn print_success(config: &ProjectConfig) {
    println!();
    println!("{}", style("✅ Project created successfully!").green().bold());
    println!();
    println!("{}", style("Next steps:").bold());
    println!();
    for line in next_steps(config) {
        if line.starts_with(char::is_numeric) {
            println!("  {}", style(line).cyan());
        } else {
            println!("  {}", style(line).dim());
        }
    }
    println!();
    println!("{} {}", style("Documentation:").cyan(), style(DOCS_URL).underlined());
    println!();
}

/// Print the captured output of a failed command
pub fn print_command_output(output: &str) {
    if !output.trim().is_empty() {
        eprintln!("{}", style(output.trim_end()).dim());
    }
}
