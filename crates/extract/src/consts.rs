use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Embedded descriptions are cut to this many characters.
pub(crate) const DESCRIPTION_MAX_CHARS: usize = 500;
/// Separator between author and title in conventional download names.
pub(crate) const FILENAME_SEPARATOR: &str = " - ";

// Release-group and edition noise such as "[EPUB]" or "[Retail]".
regex!(BRACKETED_REGEX, r"\[.*?\]");
