//! Prompt construction for the classification request.

use shelver_extract::models::Metadata;
use std::path::Path;

pub const SYSTEM_PROMPT: &str = "You are a library assistant that classifies books and documents.
Reply ONLY with exactly one word from this list:
fiction, non-fiction, papers, magazines, unsorted

Definitions:
- fiction: Novels, short stories, science fiction, fantasy, thrillers, crime fiction, literary works
- non-fiction: Reference books, self-help, biographies, business books, history, popular science
- papers: Academic papers, journal articles, dissertations, preprints
- magazines: Periodicals, magazines, comics, manga
- unsorted: When no clear category can be determined

Reply with the category name ONLY, no explanation, no punctuation.";

/// One `Label: value` line per non-empty metadata field, followed by the
/// file extension and filename, which are always present.
pub fn user_message(metadata: &Metadata, filename: &str) -> String {
    let mut lines = Vec::with_capacity(7);
    if !metadata.title.is_empty() {
        lines.push(format!("Title: {}", metadata.title));
    }
    if !metadata.author.is_empty() {
        lines.push(format!("Author: {}", metadata.author));
    }
    if !metadata.tags.is_empty() {
        lines.push(format!("Tags/Genre: {}", metadata.tags.join(", ")));
    }
    if !metadata.description.is_empty() {
        lines.push(format!("Description: {}", metadata.description));
    }
    if !metadata.source.is_none() {
        lines.push(format!("Metadata source: {}", metadata.source));
    }
    let extension = Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    lines.push(format!("File extension: {extension}"));
    lines.push(format!("Filename: {filename}"));
    lines.join("\n")
}
