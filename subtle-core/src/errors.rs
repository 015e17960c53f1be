use thiserror::Error;

pub type Result<T> = std::result::Result<T, SubtleError>;

#[derive(Debug, Error)]
pub enum SubtleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("System call failed: {0}")]
    Nix(#[from] nix::Error),
    #[error("Display connection is unavailable")]
    DisplayUnavailable,
    #[error("No widget with id {0}")]
    UnknownWidget(u32),
}
