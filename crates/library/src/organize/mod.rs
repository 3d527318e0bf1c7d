//! Moving a single file into the library.
//!
//! [`organize_file`] extracts metadata, classifies, [resolves](resolve) a
//! collision-free destination and moves the file there. When any of that
//! fails the caller may fall back to [`fallback`], which moves the file as-is
//! into `<library>/unsorted/` without ever overwriting.

mod conflict;
mod destination;
mod file;

pub use self::destination::{directory, filename, resolve};
pub use self::file::{Action, fallback, organize_file};
