// Access token resolution. The token comes from `GYAZO_TOKEN` or from
// `~/.gyazo_token`, in that order.

use crate::error::{Error, Result};
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "GYAZO_TOKEN";
pub const TOKEN_FILE: &str = ".gyazo_token";

/// Resolve the token from the process environment and home directory.
pub fn resolve_token() -> Result<String> {
    resolve_token_from(std::env::var(TOKEN_ENV).ok(), dirs::home_dir())
}

/// Resolve the token from an explicit env value and home directory.
pub fn resolve_token_from(env_token: Option<String>, home: Option<PathBuf>) -> Result<String> {
    if let Some(token) = env_token.filter(|t| !t.is_empty()) {
        debug!("using token from {}", TOKEN_ENV);
        return Ok(token);
    }

    let home = home.ok_or_else(|| {
        Error::Config(format!(
            "cannot determine home directory; set {} instead",
            TOKEN_ENV
        ))
    })?;
    load_token_file(&home.join(TOKEN_FILE))
}

fn load_token_file(path: &Path) -> Result<String> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::Config(format!(
                "gyazo token not found: set {} or write it to {}",
                TOKEN_ENV,
                path.display()
            )))
        }
        Err(e) => return Err(e.into()),
    };

    let token = data.trim_matches(|c| c == '\r' || c == '\n');
    if token.is_empty() {
        return Err(Error::Config("gyazo token is empty".into()));
    }
    debug!("using token from {}", path.display());
    Ok(token.to_string())
}
