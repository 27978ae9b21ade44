use thiserror::Error;

/// Process-level error: a message plus the exit code `dash` terminates with.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure of a single load (fetch + decode) or of the input that would start one.
///
/// None of these are fatal to the dashboard: the TUI shows them on the banner and
/// keeps the previous views, the CLI turns them into an [`AppError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The backend could not be reached or answered with something unreadable.
    #[error("Failed to reach the sales server: {0}")]
    Transport(String),

    /// The envelope came back with a non-success status.
    #[error("{0}")]
    Backend(String),

    /// The user input cannot produce a request (e.g. half a date range).
    #[error("{0}")]
    Validation(String),
}

impl LoadError {
    pub fn exit_code(&self) -> u8 {
        match self {
            LoadError::Validation(_) => 2,
            LoadError::Transport(_) | LoadError::Backend(_) => 4,
        }
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}
