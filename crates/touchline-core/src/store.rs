//! JSON artifact persistence.
//!
//! All artifacts are pretty-printed with tab indentation and end with a
//! newline. Typed artifacts are validated before every write and after
//! every read; a write replaces the whole file via a sibling temp file and
//! a rename, so readers never observe a half-written artifact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::error::{Result, ValidationError};
use crate::validate::Validate;

/// Serialize `value` the way every artifact is stored on disk.
///
/// # Errors
/// Returns an error if `value` cannot be serialized.
pub fn to_pretty_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = PathBuf::from(path);
    tmp.as_mut_os_string().push(".tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Validate `value`, then write it to `path`.
///
/// # Errors
/// Returns [`Error::Validation`](crate::Error::Validation) without touching
/// the file when `value` is invalid, or an I/O error if the write fails.
pub fn write_json<T: Serialize + Validate>(path: &Path, value: &T) -> Result<()> {
    value
        .validate()
        .map_err(|e| e.with_subject(format!("{} ({})", value.subject(), path.display())))?;
    let bytes = to_pretty_bytes(value)?;
    replace_file(path, &bytes)?;
    log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Write an untyped payload verbatim. Callers validate it beforehand.
///
/// # Errors
/// Returns an I/O error if the write fails.
pub fn write_raw(path: &Path, value: &Value) -> Result<()> {
    let bytes = to_pretty_bytes(value)?;
    replace_file(path, &bytes)?;
    log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Read an untyped payload.
///
/// # Errors
/// Returns an I/O error if the file cannot be read, or a validation error
/// if it is not JSON.
pub fn read_raw(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    let value = serde_json::from_str(&text)
        .map_err(|e| ValidationError::from_parse(path.display().to_string(), &e))?;
    Ok(value)
}

/// Read and validate a typed artifact.
///
/// # Errors
/// Returns an I/O error if the file cannot be read, or a validation error
/// if it does not deserialize or fails its schema.
pub fn read_json<T: DeserializeOwned + Validate>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    let value: T = serde_json::from_str(&text)
        .map_err(|e| ValidationError::from_parse(path.display().to_string(), &e))?;
    value
        .validate()
        .map_err(|e| e.with_subject(format!("{} ({})", value.subject(), path.display())))?;
    Ok(value)
}

/// Read a typed artifact if it exists; `Ok(None)` when the file is absent.
///
/// # Errors
/// See [`read_json`].
pub fn read_json_opt<T: DeserializeOwned + Validate>(path: &Path) -> Result<Option<T>> {
    match read_json(path) {
        Ok(value) => Ok(Some(value)),
        Err(crate::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
