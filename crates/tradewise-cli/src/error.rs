use thiserror::Error;
use tradewise_core::AnalysisError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tradewise_core::ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Core(#[from] tradewise_core::CoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Analysis(AnalysisError::MalformedTicker { .. }) => 2,
            Self::Analysis(_) => 3,
            Self::Core(tradewise_core::CoreError::Validation(_)) => 2,
            Self::Core(_) | Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
