//! Error types for medusa-setup

use thiserror::Error;

/// Result type alias using medusa-setup's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Setup error types
#[derive(Error, Debug)]
pub enum Error {
    /// Could not authenticate against the PostgreSQL server
    #[error(
        "Couldn't connect to PostgreSQL. Make sure you have PostgreSQL installed \
         and the credentials you provided are correct: {message}"
    )]
    AuthFailed { message: String },

    /// CREATE DATABASE statement failed
    #[error("An error occurred while trying to create database '{name}': {message}")]
    DatabaseCreate { name: String, message: String },

    /// Invalid starter repository URL
    #[error("Invalid repository URL: {url}")]
    InvalidRepoUrl { url: String },

    /// Destination directory already exists
    #[error("A directory already exists at: {path}")]
    DestinationExists { path: String },

    /// Clone failed
    #[error("Failed to clone starter repository: {message}")]
    CloneFailed { message: String },

    /// Required command not found
    #[error("Required command not found: {command}")]
    CommandNotFound { command: String },

    /// External command exited with a non-zero status
    #[error("Command '{command}' failed: {message}")]
    ProcessFailed { command: String, message: String },

    /// Dependency installation failed with both package managers
    #[error("Dependency installation failed: {message}")]
    InstallFailed { message: String },

    /// Operation interrupted by the user
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database driver error
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an auth failed error
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::AuthFailed {
            message: message.into(),
        }
    }

    /// Create a database create error
    pub fn database_create(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DatabaseCreate {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid repo URL error
    pub fn invalid_repo_url(url: impl Into<String>) -> Self {
        Self::InvalidRepoUrl { url: url.into() }
    }

    /// Create a destination exists error
    pub fn destination_exists(path: impl Into<String>) -> Self {
        Self::DestinationExists { path: path.into() }
    }

    /// Create a clone failed error
    pub fn clone_failed(message: impl Into<String>) -> Self {
        Self::CloneFailed {
            message: message.into(),
        }
    }

    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Create a process failed error
    pub fn process_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProcessFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create an install failed error
    pub fn install_failed(message: impl Into<String>) -> Self {
        Self::InstallFailed {
            message: message.into(),
        }
    }

    /// Whether this error was caused by a user interrupt
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
