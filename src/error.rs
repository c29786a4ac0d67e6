use thiserror::Error;

/// Main error type for the Cadence-Compositor library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    #[error("Composition error: {0}")]
    Composition(#[from] CompositionError),

    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Timeline scaling and trimming errors
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Invalid scale factor: {value}")]
    InvalidScaleFactor { value: f64 },

    #[error("Invalid work area: {start}-{end}")]
    InvalidWorkArea { start: f64, end: f64 },

    #[error("Invalid hard cap: {value}")]
    InvalidHardCap { value: f64 },
}

/// Composition-specific errors
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("Template not found: {id}")]
    TemplateNotFound { id: String },

    #[error("Clip sequencing failed: {reason}")]
    SequencingFailed { reason: String },
}

/// Host project snapshot errors
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Failed to parse project snapshot: {path} - {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Project snapshot not found: {path}")]
    FileNotFound { path: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {key}")]
    MissingKey { key: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Whether the batch can continue with the remaining (source, template) pairs
    pub fn is_recoverable(&self) -> bool {
        // Bad geometry or a missing template only poisons the pair it came from
        matches!(self, Self::Timeline(_) | Self::Composition(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Project(ProjectError::FileNotFound { path }) => {
                format!("Could not open project snapshot '{}'. Export it from the host first.", path)
            }
            Self::Composition(CompositionError::TemplateNotFound { id }) => {
                format!("Template '{}' not found. Add a '_template:{}:<suffix>' composition to the project.", id, id)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
