// expert_core/src/error.rs

use std::fmt;

use thiserror::Error;

/// Category of an external API failure.
///
/// Display names follow the provider SDK's exception names, so a rendered
/// error reads the same as the provider's own tooling would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalFailureKind {
    Authentication,
    RateLimit,
    NotFound,
    BadRequest,
    InternalServer,
    Status(u16),
    Timeout,
    Connection,
    MalformedResponse,
}

impl ExternalFailureKind {
    /// Classifies a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            429 => Self::RateLimit,
            404 => Self::NotFound,
            400 | 422 => Self::BadRequest,
            500..=599 => Self::InternalServer,
            other => Self::Status(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "AuthenticationError",
            Self::RateLimit => "RateLimitError",
            Self::NotFound => "NotFoundError",
            Self::BadRequest => "BadRequestError",
            Self::InternalServer => "InternalServerError",
            Self::Status(_) => "APIStatusError",
            Self::Timeout => "APITimeoutError",
            Self::Connection => "APIConnectionError",
            Self::MalformedResponse => "MalformedResponse",
        }
    }
}

impl fmt::Display for ExternalFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ExpertError {
    #[error("unknown persona: '{key}'")]
    UnknownPersona { key: String },

    #[error("{kind} - {message}")]
    ExternalService {
        kind: ExternalFailureKind,
        message: String,
    },

    #[error("{message}")]
    Configuration { message: String },
}

impl ExpertError {
    pub fn external(kind: ExternalFailureKind, message: impl Into<String>) -> Self {
        Self::ExternalService { kind, message: message.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Name of the failure category, e.g. `AuthenticationError`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::UnknownPersona { .. } => "UnknownPersonaError",
            Self::ExternalService { kind, .. } => kind.as_str(),
            Self::Configuration { .. } => "ConfigurationError",
        }
    }

    /// Human-readable detail without the category prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::UnknownPersona { key } => format!("unknown persona: '{}'", key),
            Self::ExternalService { message, .. } | Self::Configuration { message } => message.clone(),
        }
    }

    /// Configuration errors stop the process; everything else is per-request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
