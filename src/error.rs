// Error type shared by the library modules. The binary wraps these in
// `anyhow` to add context before printing them.

use crate::clipboard::ClipboardError;
use reqwest::StatusCode;

/// Everything that can go wrong between resolving a token and printing a URL.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or empty access token, unusable endpoint, etc.
    #[error("{0}")]
    Config(String),

    /// Reading the image file, stdin or the token file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// The request never got a response (DNS, TLS, connection reset...).
    #[error("failed to send upload request: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with something other than 200. The message is the
    /// raw response body so the service's own wording reaches the user.
    #[error("{body}")]
    Upload { status: StatusCode, body: String },

    #[error("failed to decode response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
