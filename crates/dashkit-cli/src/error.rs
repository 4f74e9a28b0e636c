use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] dashkit_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] dashkit_store::StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<dashkit_core::CoreError> for CliError {
    fn from(error: dashkit_core::CoreError) -> Self {
        match error {
            dashkit_core::CoreError::Validation(error) => Self::Validation(error),
            dashkit_core::CoreError::Store(error) => Self::Store(error),
            dashkit_core::CoreError::Serialization(error) => Self::Serialization(error),
        }
    }
}

impl From<dashkit_core::VoiceError> for CliError {
    fn from(error: dashkit_core::VoiceError) -> Self {
        Self::Command(error.to_string())
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::Store(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
