use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

/// Book and document formats accepted from the inbox.
///
/// Only [`Epub`](Self::Epub) and [`Pdf`](Self::Pdf) carry embedded metadata
/// that is read; every other format relies on the filename alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Epub,
    Pdf,
    /// Comic book ZIP archive
    Cbz,
    /// Comic book RAR archive
    Cbr,
    Mobi,
    /// Kindle Format 8
    Azw3,
}
impl Format {
    pub const ALL: [Format; 6] = [Self::Epub, Self::Pdf, Self::Cbz, Self::Cbr, Self::Mobi, Self::Azw3];

    /// Lowercase extension without the leading dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Epub => "epub",
            Self::Pdf => "pdf",
            Self::Cbz => "cbz",
            Self::Cbr => "cbr",
            Self::Mobi => "mobi",
            Self::Azw3 => "azw3",
        }
    }

    /// Match a bare extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| extension.eq_ignore_ascii_case(format.as_str()))
    }

    /// Detect the format from a path's extension.
    ///
    /// ```rust
    /// use shelver_extract::models::Format;
    /// assert_eq!(Format::from_path("/downloads/Book.EPUB"), Some(Format::Epub));
    /// assert_eq!(Format::from_path("/downloads/notes.txt"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref().extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Returns `true` if the path has one of the supported book extensions.
pub fn is_supported(path: impl AsRef<Path>) -> bool {
    Format::from_path(path).is_some()
}
