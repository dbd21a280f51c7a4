use anyhow::{anyhow, Result};
use std::path::Path;

/// Reads the `kind` file at `path` into a string, naming both in the error.
pub fn read(path: &Path, kind: &str) -> Result<String> {
    match std::fs::read_to_string(path) {
        Err(e) => Err(anyhow!("Reading {} file `{}`: {}", kind, path.display(), e)),
        Ok(contents) => Ok(contents),
    }
}
