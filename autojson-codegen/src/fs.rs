//! Filesystem helpers built on capability-scoped directory handles.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::Write;

use crate::error::CodegenError;

/// Reads a UTF-8 text file.
///
/// # Errors
///
/// Returns [`CodegenError::Io`] if the parent directory cannot be opened or
/// the file cannot be read.
pub fn read_to_string(path: &Utf8Path) -> Result<String, CodegenError> {
    let (dir, name) = open_parent(path)?;
    dir.read_to_string(name).map_err(|source| io_error(path, source))
}

/// Reads a UTF-8 text file if it exists.
///
/// # Errors
///
/// Returns [`CodegenError::Io`] for failures other than a missing file.
pub fn read_optional(path: &Utf8Path) -> Result<Option<String>, CodegenError> {
    match read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(CodegenError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Writes `content` to `path`, creating or truncating the file.
///
/// The parent directory must already exist.
///
/// # Errors
///
/// Returns [`CodegenError::Io`] if the file cannot be created or written.
pub fn write_artifact(path: &Utf8Path, content: &str) -> Result<(), CodegenError> {
    let (dir, name) = open_parent(path)?;
    let mut file = dir
        .open_with(
            name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|source| io_error(path, source))?;
    file.write_all(content.as_bytes())
        .map_err(|source| io_error(path, source))
}

fn open_parent(path: &Utf8Path) -> Result<(Dir, &str), CodegenError> {
    let name = path.file_name().ok_or_else(|| {
        io_error(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|source| io_error(parent, source))?;
    Ok((dir, name))
}

fn io_error(path: &Utf8Path, source: std::io::Error) -> CodegenError {
    CodegenError::Io {
        path: path.to_path_buf(),
        source,
    }
}
