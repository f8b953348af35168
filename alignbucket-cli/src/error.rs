//! Error handling for alignbucket CLI

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for alignbucket CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("No input: {message}")]
    InputUnavailable { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },
}

impl CliError {
    pub fn input_unavailable<S: Into<String>>(message: S) -> Self {
        Self::InputUnavailable { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::InputUnavailable { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Pass a length distribution with --distribution <file>\n\
                 • Or pass a sequence file with --fasta <file>",
            );
        }

        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your alignbucket.toml configuration file\n\
                 • Verify that all configuration values are valid",
            );
        }

        CliError::Validation { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • --delta takes a coverage percentage between 1 and 100",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
