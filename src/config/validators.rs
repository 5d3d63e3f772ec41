//! One check per configuration field. Each takes the raw value and hands it back
//! (converted to its typed form where there is one) or names what was wrong.
//!
//! The `serde_json::Value` variants exist so a config produced by an external loader
//! can be checked strictly: `"true"`, `1` and `null` are not booleans here.

use super::error::ValidationError;
use crate::fmt::{FormatTemplate, Placeholder};
use crate::level::Level;
use chrono::format::{Item, StrftimeItems};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

/// Short description of a JSON value for error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string \"{s}\""),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

/// Whitespace-only strings count as empty.
///
/// # Errors
/// [`ValidationError::Empty`] when nothing but whitespace is given.
pub fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value)
}

/// Case-insensitive match against the five level names.
///
/// # Errors
/// [`ValidationError::Empty`] or [`ValidationError::UnknownLevel`].
pub fn level_name(field: &'static str, value: &str) -> Result<Level, ValidationError> {
    non_empty(field, value)?
        .parse()
        .map_err(|_| ValidationError::UnknownLevel {
            field,
            value: value.to_string(),
        })
}

/// A template must at least carry the message through.
///
/// # Errors
/// [`ValidationError::Empty`] or [`ValidationError::MissingPlaceholder`].
pub fn format(field: &'static str, value: &str) -> Result<FormatTemplate, ValidationError> {
    let template = FormatTemplate::parse(non_empty(field, value)?);
    if !template.contains(Placeholder::Msg) {
        return Err(ValidationError::MissingPlaceholder {
            field,
            placeholder: "{msg}",
        });
    }
    Ok(template)
}

/// chrono panics while rendering an invalid pattern, so reject it up front.
///
/// # Errors
/// [`ValidationError::Empty`] or [`ValidationError::BadTimestampFormat`].
pub fn timestamp_format(value: &str) -> Result<&str, ValidationError> {
    non_empty("timestamp_format", value)?;
    if StrftimeItems::new(value).any(|item| matches!(item, Item::Error)) {
        return Err(ValidationError::BadTimestampFormat {
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// The directory must exist, or its nearest existing ancestor must be a writable
/// directory so it can be created later. Nothing is created here.
///
/// # Errors
/// [`ValidationError::PathNotWritable`] naming the first blocking component.
pub fn writable_dir(path: &Path) -> Result<&Path, ValidationError> {
    let not_writable = |reason: String| ValidationError::PathNotWritable {
        path: path.to_path_buf(),
        reason,
    };

    let mut probe = path;
    loop {
        match fs::metadata(probe) {
            Ok(meta) if !meta.is_dir() => {
                return Err(not_writable(format!(
                    "{} is not a directory",
                    probe.display()
                )));
            }
            Ok(_) if !can_create_in(probe) => {
                return Err(not_writable(format!(
                    "{} is not writable by this process",
                    probe.display()
                )));
            }
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                probe = match probe.parent() {
                    Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
                    Some(parent) => parent,
                    None => return Err(not_writable(e.to_string())),
                };
            }
            Err(e) => return Err(not_writable(e.to_string())),
        }
    }
}

/// Asks the kernel whether this process may add entries to `dir`.
#[cfg(unix)]
fn can_create_in(dir: &Path) -> bool {
    use nix::unistd::{AccessFlags, access};
    access(dir, AccessFlags::W_OK | AccessFlags::X_OK).is_ok()
}

#[cfg(not(unix))]
fn can_create_in(dir: &Path) -> bool {
    fs::metadata(dir).is_ok_and(|meta| !meta.permissions().readonly())
}

/// A bare file name: the log file must land inside the validated directory.
///
/// # Errors
/// [`ValidationError::Empty`] or [`ValidationError::NotAFileName`].
pub fn file_name<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = non_empty(field, value)?;
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ValidationError::NotAFileName {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Raw string field: must be a JSON string and non-empty.
///
/// # Errors
/// [`ValidationError::WrongType`] or [`ValidationError::Empty`].
pub fn string<'a>(field: &'static str, value: &'a Value) -> Result<&'a str, ValidationError> {
    let s = value.as_str().ok_or_else(|| ValidationError::WrongType {
        field,
        expected: "a string",
        found: describe(value),
    })?;
    non_empty(field, s)
}

/// Raw boolean field: only JSON `true`/`false` are accepted.
///
/// # Errors
/// [`ValidationError::WrongType`] for anything else.
pub fn boolean(field: &'static str, value: &Value) -> Result<bool, ValidationError> {
    value.as_bool().ok_or_else(|| ValidationError::WrongType {
        field,
        expected: "a boolean",
        found: describe(value),
    })
}

/// Raw non-negative integer field.
///
/// # Errors
/// [`ValidationError::Negative`] for integers below zero, [`ValidationError::WrongType`]
/// for fractions and non-numbers.
pub fn count(field: &'static str, value: &Value) -> Result<u64, ValidationError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_i64() {
        Some(n) => Err(ValidationError::Negative { field, value: n }),
        None => Err(ValidationError::WrongType {
            field,
            expected: "a non-negative integer",
            found: describe(value),
        }),
    }
}

/// Raw level field.
///
/// # Errors
/// Any error from [`string`] or [`level_name`].
pub fn level(field: &'static str, value: &Value) -> Result<Level, ValidationError> {
    level_name(field, string(field, value)?)
}
