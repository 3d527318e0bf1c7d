//! Path validation for destinations inside the library root.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Normalises a path relative to the library root and rejects anything that
/// would escape it (leading `..`, absolute prefixes, null bytes).
///
/// The result is suitable for joining onto the library root. A path that
/// normalises to nothing is rejected too: the root itself is never a valid
/// destination.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use shelver_storage::validate_path;
/// assert!(validate_path("fiction/Doe, Jane/My Novel.epub").is_ok());
/// assert!(validate_path("../etc/passwd").is_err());
/// assert_eq!(
///     validate_path("fiction/./Doe, Jane//My Novel.epub").unwrap(),
///     Path::new("fiction/Doe, Jane/My Novel.epub")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(original.to_path_buf());
    let mut components = Vec::new();
    for component in original.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes survive Path::components() on Unix but truncate in syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(invalid());
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(invalid()),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(invalid()),
        false => Ok(components.into_iter().collect()),
    }
}
