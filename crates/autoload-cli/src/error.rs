use autoload::AutoloadError;
use miette::Diagnostic;
use thiserror::Error;

/// CLI-specific error type that provides rich diagnostics
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Autoload(#[from] AutoloadError),

    #[error("{count} of {total} types could not be located")]
    #[diagnostic(
        code(autoload::cli::not_found),
        help("Check the search roots and ignored directories in the configuration")
    )]
    NotFound { count: usize, total: usize },

    #[error("No loader could define `{type_name}`")]
    #[diagnostic(code(autoload::cli::undefined))]
    Undefined { type_name: String },
}
