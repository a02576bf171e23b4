/// Engine setup failures. Interface calls report [`hush_hal::Status`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dispatch pool needs between 1 and {max} threads, got {got}")]
    InvalidThreadCount { got: usize, max: usize },
    #[error("failed to spawn dispatch worker: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
