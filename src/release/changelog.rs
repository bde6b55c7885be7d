//! Changelog extraction from upstream commit messages
//!
//! A release's news entry is a header line (version, short commit, date)
//! followed by one bullet per upstream commit: the first paragraph of each
//! message, folded onto a single line, newest first.

/// Render commit messages as a bullet list, newest first
///
/// Messages beyond `limit` and messages whose first paragraph is empty are
/// dropped.
pub fn format_changes(messages: &[String], limit: usize) -> String {
  messages
    .iter()
    .take(limit)
    .filter_map(|message| first_paragraph(message))
    .map(|paragraph| format!("- {}", paragraph))
    .collect::<Vec<String>>()
    .join("\n")
}

/// Compose the news entry written into the manifest metadata
pub fn news_entry(version: &str, commit: &str, date: &str, changes: &str) -> String {
  format!("{} #{} ({})\n{}", version, commit, date, changes)
}

/// First paragraph of a commit message, folded to one line
fn first_paragraph(message: &str) -> Option<String> {
  let paragraph = message.trim().split("\n\n").next()?.trim();
  if paragraph.is_empty() {
    return None;
  }

  Some(paragraph.split_whitespace().collect::<Vec<&str>>().join(" "))
}
