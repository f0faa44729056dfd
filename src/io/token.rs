use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error type for token storage
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("no token file location (set [api].token_file or a config directory)")]
    NoLocation,
    #[error("could not write token file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not remove token file {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read the stored bearer token. Missing or unreadable files yield an
/// empty token.
pub fn read_token(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return String::new();
    };
    match fs::read_to_string(path) {
        Ok(content) => content.trim().to_string(),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "could not read token file");
            }
            String::new()
        }
    }
}

/// Atomically store `token` at `path`, creating parent directories.
pub fn write_token(path: Option<&Path>, token: &str) -> Result<(), TokenError> {
    let path = path.ok_or(TokenError::NoLocation)?;
    let write_err = |source: std::io::Error| TokenError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(token.trim().as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    tracing::info!(path = %path.display(), "stored api token");
    Ok(())
}

/// Remove the stored token. Returns false if there was none.
pub fn clear_token(path: Option<&Path>) -> Result<bool, TokenError> {
    let path = path.ok_or(TokenError::NoLocation)?;
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(TokenError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}
