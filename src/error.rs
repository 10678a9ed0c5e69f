use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Stats already updated today")]
    AlreadyUpdated,

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status an outer request handler answers with for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            Error::InvalidCredentials | Error::Unauthorized(_) => 401,
            Error::UserNotFound(_) => 404,
            Error::UsernameTaken(_) => 409,
            Error::AlreadyUpdated => 429,
            Error::Configuration(_)
            | Error::PasswordHash(_)
            | Error::Io(_)
            | Error::Json(_) => 500,
        }
    }
}
