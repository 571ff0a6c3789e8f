use thiserror::Error;

/// Errors raised while preparing BrowserStack capabilities
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BrowserStackError {
    /// `remote.platform` names no known platform
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

impl BrowserStackError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BrowserStackError::UnknownPlatform(_) => "ERR_BSTACK_UNKNOWN_PLATFORM",
        }
    }
}
