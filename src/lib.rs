// Library root
// -----------
// The `gyazo` binary is a thin shell over these modules.
//
// Module responsibilities:
// - `api`: the upload client (multipart request, bearer auth, JSON result).
// - `config`: access token resolution from the environment or dotfile.
// - `clipboard`: reading an image from the system clipboard.
// - `cli`: flags, input selection and output formatting.
// - `ui`: interactive prompts and the upload spinner.
pub mod api;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod ui;

pub use api::{GyazoClient, UploadMetadata, UploadedImage};
pub use error::{Error, Result};
