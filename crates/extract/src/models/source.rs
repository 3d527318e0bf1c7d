use std::fmt::{Display, Formatter, Result as FmtResult};

/// Where the values in a [`Metadata`](super::Metadata) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Source {
    /// Nothing could be read.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = ""))]
    None,
    #[cfg_attr(feature = "serde", serde(rename = "epub-metadata"))]
    Epub,
    #[cfg_attr(feature = "serde", serde(rename = "pdf-metadata"))]
    Pdf,
    #[cfg_attr(feature = "serde", serde(rename = "filename"))]
    Filename,
}
impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Epub => "epub-metadata",
            Self::Pdf => "pdf-metadata",
            Self::Filename => "filename",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::None
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
