// Error type for the host side (window, snapshot, config).
// The engine itself never fails: an absent surface or an exhausted mask just
// degrades to "nothing drawn" / "no particle".
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("window init error: {0}")]
    WindowInit(String),
    /// Pushing the framebuffer to the window failed.
    #[error("window update error: {0}")]
    WindowUpdate(String),
    /// Writing the PNG snapshot failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] image::ImageError),
    /// Command line values that cannot drive the engine.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
