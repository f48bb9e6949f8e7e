use crate::app_error::AppError;
use crate::file_processor;
use std::path::PathBuf;

/// The LLM backends the tool can talk to, selected with `--provider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Gemini,
    Claude,
    ChatGpt,
    Xai,
    Watsonx,
}

pub const PROVIDER_NAMES: [&str; 5] = ["gemini", "claude", "chatgpt", "xai", "watsonx"];

impl Provider {
    pub fn from_name(name: &str) -> Result<Self, AppError> {
        match name {
            "gemini" => Ok(Provider::Gemini),
            "claude" => Ok(Provider::Claude),
            "chatgpt" => Ok(Provider::ChatGpt),
            "xai" => Ok(Provider::Xai),
            "watsonx" => Ok(Provider::Watsonx),
            _ => Err(AppError::Config(format!(
                "Provider '{}' not found. Available providers: {}",
                name,
                PROVIDER_NAMES.join(", ")
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Claude => "claude",
            Provider::ChatGpt => "chatgpt",
            Provider::Xai => "xai",
            Provider::Watsonx => "watsonx",
        }
    }

    /// Environment variable holding the provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GOOGLE_API_KEY",
            Provider::Claude => "ANTHROPIC_API_KEY",
            Provider::ChatGpt => "OPENAI_API_KEY",
            Provider::Xai => "XAI_API_KEY",
            Provider::Watsonx => "WATSONX_API_KEY",
        }
    }
}

#[derive(Debug)]
pub struct CliArgs {
    pub provider: Provider,
    pub recursive: bool,
    pub extensions: Vec<String>,
    pub assume_yes: bool,
    pub files: Vec<PathBuf>,
    pub trace: bool,
}

pub fn parse_cli_args() -> Result<CliArgs, AppError> {
    parse_args_from(std::env::args().skip(1))
}

pub(crate) fn parse_args_from<I>(args: I) -> Result<CliArgs, AppError>
where
    I: Iterator<Item = String>,
{
    let mut args = args;
    let mut provider = Provider::default();
    let mut recursive = false;
    let mut extensions = vec![file_processor::DEFAULT_EXTENSION.to_string()];
    let mut assume_yes = false;
    let mut files = Vec::new();
    let mut trace = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-r" | "--recursive" => recursive = true,
            "-y" | "--yes" => assume_yes = true,
            "--trace" => trace = true,
            "-x" | "--extensions" => {
                let value = args.next().ok_or_else(|| {
                    AppError::Config("Missing value for --extensions argument".to_string())
                })?;
                extensions = file_processor::parse_extensions(&value);
            }
            "-f" | "--files" => {
                let value = args.next().ok_or_else(|| {
                    AppError::Config("Missing value for --files argument".to_string())
                })?;
                files = value
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(PathBuf::from)
                    .collect();
            }
            "--provider" => {
                let value = args.next().ok_or_else(|| {
                    AppError::Config("Missing value for --provider argument".to_string())
                })?;
                provider = Provider::from_name(&value)?;
            }
            _ => {
                return Err(AppError::Config(format!("Unknown argument: {arg}")));
            }
        }
    }

    Ok(CliArgs {
        provider,
        recursive,
        extensions,
        assume_yes,
        files,
        trace,
    })
}
