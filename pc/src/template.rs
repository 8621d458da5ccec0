//! A single prompt template

use serde::Serialize;
use std::path::{Path, PathBuf};

/// One edit instruction loaded from `<category>/<name>.md`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptTemplate {
    /// File stem, used as the lookup identifier
    pub name: String,
    /// Name of the directory the file lives in
    pub category: String,
    /// Body with any leading `#` title line removed, trimmed
    pub content: String,
    /// Where the template was loaded from
    pub file_path: PathBuf,
}

impl PromptTemplate {
    /// Build a template from raw file text
    pub fn from_source(category: impl Into<String>, file_path: impl AsRef<Path>, source: &str) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let name = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            name,
            category: category.into(),
            content: strip_title(source).trim().to_string(),
            file_path,
        }
    }

    /// Human-readable name: `comic-book.md` becomes `Comic Book`
    pub fn display_name(&self) -> String {
        let stem = self
            .file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.name.clone());
        title_case(&stem.replace(['-', '_'], " "))
    }
}

/// Drop the first line if it is a markdown-style title
fn strip_title(source: &str) -> &str {
    if !source.starts_with('#') {
        return source;
    }
    match source.split_once('\n') {
        Some((_, rest)) => rest,
        None => "",
    }
}

/// Upper-case the first letter of every run of letters, lower-case the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_title_line_stripped() {
        let t = PromptTemplate::from_source("style", "style/sketch.md", "# Title\nDo X.");
        assert_eq!(t.content, "Do X.");
        assert_eq!(t.name, "sketch");
        assert_eq!(t.category, "style");
    }

    #[test]
    fn test_title_line_then_blank_line() {
        let t = PromptTemplate::from_source("style", "style/sketch.md", "# Title\n\nDo X.\n");
        assert_eq!(t.content, "Do X.");
    }

    #[test]
    fn test_heading_not_on_first_line_kept() {
        let source = "Intro line.\n# Not a title\nMore.";
        let t = PromptTemplate::from_source("misc", "misc/a.md", source);
        assert_eq!(t.content, source);
    }

    #[test]
    fn test_only_title() {
        let t = PromptTemplate::from_source("misc", "misc/empty.md", "# Just a title");
        assert_eq!(t.content, "");
    }

    #[test]
    fn test_no_title_trimmed() {
        let t = PromptTemplate::from_source("misc", "misc/b.md", "\n  Make it warmer.  \n\n");
        assert_eq!(t.content, "Make it warmer.");
    }

    #[test]
    fn test_display_name() {
        let t = PromptTemplate::from_source("style", "style/comic-book.md", "x");
        assert_eq!(t.display_name(), "Comic Book");

        let t = PromptTemplate::from_source("style", "style/oil_painting-HEAVY.md", "x");
        assert_eq!(t.display_name(), "Oil Painting Heavy");

        let t = PromptTemplate::from_source("style", "style/3d-render.md", "x");
        assert_eq!(t.display_name(), "3D Render");
    }

    proptest! {
        #[test]
        fn prop_display_name_words(words in prop::collection::vec("[a-z]{1,8}", 1..5), sep in "[-_]") {
            let stem = words.join(sep.as_str());
            let t = PromptTemplate::from_source("c", format!("c/{stem}.md"), "body");
            let display = t.display_name();

            prop_assert_eq!(display.to_lowercase(), words.join(" "));
            for word in display.split(' ') {
                let first = word.chars().next().unwrap();
                prop_assert!(first.is_uppercase());
            }
        }
    }
}
