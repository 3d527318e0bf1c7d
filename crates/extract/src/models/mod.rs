mod format;
mod metadata;
mod source;

pub use self::format::{Format, is_supported};
pub use self::metadata::Metadata;
pub use self::source::Source;
