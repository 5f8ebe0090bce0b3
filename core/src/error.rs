use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to load config '{path}': {reason}")]
    ConfigLoad { path: String, reason: String },

    #[error("Invalid config value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Stage {number} ({name}) failed: {source}")]
    Stage {
        number: u8,
        name: &'static str,
        #[source]
        source: Box<GenError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Gave up finding a unique {what} after {attempts} attempts")]
    Exhausted { what: &'static str, attempts: u32 },

    #[error("{0}")]
    Panicked(String),
}

impl GenError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::ConfigLoad { .. } => 1,
            Self::Validation { .. } => 3,
            _ => 2,
        }
    }
}

pub type GenResult<T> = Result<T, GenError>;
