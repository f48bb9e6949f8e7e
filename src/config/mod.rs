use crate::app_error::AppError;
use crate::cli::{CliArgs, Provider};
use std::fs;
use std::path::Path;

#[cfg(test)]
mod config_test;

/// Required file holding the user's processing instructions.
pub const INSTRUCTIONS_FILE: &str = "commander.txt";

/// Optional file of standing instructions; `#` lines are comments.
pub const SYSTEM_FILE: &str = "system.txt";

pub const WATSONX_PROJECT_ID_VAR: &str = "WATSONX_PROJECT_ID";

#[derive(Debug)]
pub struct Config {
    pub provider: Provider,
    pub api_key: String,
    /// Only populated for watsonx, which scopes calls to a project.
    pub project_id: Option<String>,
    pub instructions: String,
}

impl Config {
    pub fn load(args: &CliArgs) -> Result<Self, AppError> {
        Self::load_from_dir(args, Path::new("."))
    }

    pub fn load_from_dir(args: &CliArgs, base_dir: &Path) -> Result<Self, AppError> {
        let api_key = read_api_key(args.provider)?;
        let project_id = match args.provider {
            Provider::Watsonx => Some(read_required_env(WATSONX_PROJECT_ID_VAR, "watsonx")?),
            _ => None,
        };

        let commander_text = read_commander_file(base_dir)?;
        let system_text = read_system_file(base_dir)?;
        let instructions = if system_text.is_empty() {
            commander_text
        } else {
            format!("{system_text}\n\n{commander_text}")
        };

        Ok(Self {
            provider: args.provider,
            api_key,
            project_id,
            instructions,
        })
    }
}

fn read_api_key(provider: Provider) -> Result<String, AppError> {
    read_required_env(provider.api_key_var(), provider.name())
}

fn read_required_env(var: &str, provider_name: &str) -> Result<String, AppError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::Config(format!(
            "{var} is not set. The {provider_name} provider requires it in the environment, e.g. {var}=your_value"
        ))),
    }
}

pub(crate) fn read_commander_file(base_dir: &Path) -> Result<String, AppError> {
    let path = base_dir.join(INSTRUCTIONS_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(content.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::Config(format!(
            "'{INSTRUCTIONS_FILE}' not found. Create it with your processing instructions."
        ))),
        Err(e) => Err(AppError::Config(format!(
            "Failed to read '{INSTRUCTIONS_FILE}': {e}"
        ))),
    }
}

// Missing system.txt is fine; it is an optional preamble.
pub(crate) fn read_system_file(base_dir: &Path) -> Result<String, AppError> {
    let path = base_dir.join(SYSTEM_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => {
            let kept: Vec<&str> = content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#'))
                .collect();
            Ok(kept.join("\n").trim().to_string())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(AppError::Config(format!(
            "Failed to read '{SYSTEM_FILE}': {e}"
        ))),
    }
}
