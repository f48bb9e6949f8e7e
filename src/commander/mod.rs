use crate::app_error::AppError;
use crate::cli::CliArgs;
use crate::config::Config;
use crate::file_processor::{self, FileProcessor};
use crate::file_updater;
use crate::llm::{self, FilesData};
use crate::logger::Logger;
use crate::response_parser;
use std::io::Write;
use std::path::{Path, PathBuf};


pub async fn run(logger: &Logger, cli_args: CliArgs) -> Result<(), AppError> {
    let config = Config::load(&cli_args)?;

    let found_files = if cli_args.files.is_empty() {
        println!(
            "Finding files {}...",
            if cli_args.recursive {
                "(recursive)"
            } else {
                "(current directory only)"
            }
        );
        let processor = FileProcessor::new(cli_args.recursive, cli_args.extensions.clone());
        processor.find_files(Path::new("."))?
    } else {
        validate_explicit_files(&cli_args.files)?
    };

    if found_files.is_empty() {
        return Err(AppError::Config(format!(
            "No files found with extensions: {}",
            cli_args.extensions.join(", ")
        )));
    }

    println!("Found {} files:", found_files.len());
    for file in &found_files {
        println!("  - {}", file.display());
    }

    let files_data = read_files_data(&found_files);
    if files_data.is_empty() {
        return Err(AppError::Config("No files could be read.".to_string()));
    }

    println!(
        "Processing files with the {} provider...",
        config.provider.name()
    );
    let response = llm::process_files(&config, &files_data, logger).await?;

    println!("Parsing response...");
    let modified = if cli_args.trace {
        response_parser::parse_with_trace(&response, &mut response_parser::StdoutSink)
    } else {
        response_parser::parse(&response)
    };

    if modified.is_empty() {
        println!("No file changes were returned.");
        return Ok(());
    }

    println!("Files to be modified: {}", modified.len());
    for path in modified.keys() {
        println!("  - {path}");
    }

    if cli_args.assume_yes {
        println!("Auto-confirming file modifications (--yes provided)");
    } else if !confirm("Proceed with file modifications? (y/N): ")? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let report = file_updater::apply_updates(&modified);
    if !report.all_succeeded() {
        return Err(AppError::FileUpdate(format!(
            "{} of {} updates failed; see messages above.",
            report.failures.len(),
            modified.len()
        )));
    }

    println!("Processing complete. Backups were created with the .backup extension.");
    Ok(())
}

// `-f` bypasses discovery, but every listed file must exist up front so a
// typo fails before any LLM call is made.
pub(crate) fn validate_explicit_files(files: &[PathBuf]) -> Result<Vec<PathBuf>, AppError> {
    let missing: Vec<&PathBuf> = files.iter().filter(|f| !f.is_file()).collect();
    if !missing.is_empty() {
        let listed: Vec<String> = missing.iter().map(|f| f.display().to_string()).collect();
        return Err(AppError::Config(format!(
            "The following files do not exist: {}",
            listed.join(", ")
        )));
    }
    Ok(files.to_vec())
}

pub(crate) fn read_files_data(paths: &[PathBuf]) -> FilesData {
    let mut files_data = FilesData::new();
    for path in paths {
        let Some(content) = file_processor::read_file_content(path) else {
            continue;
        };
        let language = file_processor::language_for_extension(path);
        println!(
            "  Read {}: {} characters [{}]",
            path.display(),
            content.len(),
            if language.is_empty() { "text" } else { language }
        );
        files_data.insert(path.clone(), (content, language.to_string()));
    }
    files_data
}

fn confirm(question: &str) -> Result<bool, AppError> {
    print!("{question}");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
