use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Top-level library shelf an item is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Novels, short stories, literary works
    Fiction,
    /// Reference, biography, history, popular science
    NonFiction,
    /// Academic papers, articles, dissertations, preprints
    Papers,
    /// Periodicals, comics, manga
    Magazines,
    /// No clear category, or classification failed
    #[default]
    Unsorted,
}
impl Category {
    pub const ALL: [Category; 5] = [Self::Fiction, Self::NonFiction, Self::Papers, Self::Magazines, Self::Unsorted];

    /// Directory name under the library root, and the token the model must answer with.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fiction => "fiction",
            Self::NonFiction => "non-fiction",
            Self::Papers => "papers",
            Self::Magazines => "magazines",
            Self::Unsorted => "unsorted",
        }
    }
}
impl FromStr for Category {
    type Err = Error;

    /// Trimmed, case-insensitive, exact match. Anything else (including
    /// "nonfiction" or a trailing full stop) is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let answer = s.trim();
        match Self::ALL.into_iter().find(|category| answer.eq_ignore_ascii_case(category.as_str())) {
            Some(category) => Ok(category),
            None => exn::bail!(ErrorKind::UnexpectedAnswer(answer.to_string())),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
