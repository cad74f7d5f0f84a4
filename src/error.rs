//! Error types for immo-assist. Each layer owns its error enum; nothing
//! here crosses the pipeline boundary to the end user.

/// Configuration-related errors. All of these are fatal at startup —
/// the process must not begin serving with a broken configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),
}

/// Generation backend errors. The pipeline never surfaces these to the
/// end user — they degrade to the fixed apology string.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Request to generation backend failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Generation backend returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response from generation backend: {0}")]
    InvalidResponse(String),
}

/// Pipeline-related errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reply emission failed. Terminal for the message — no retry,
    /// no fallback channel.
    #[error("Reply emission failed: {0}")]
    Emission(String),
}
