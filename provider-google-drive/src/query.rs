//! Drive search expressions
//!
//! Search queries are built as a [`Filter`] tree and rendered to the Drive v2
//! `q` syntax. String literals are always escaped, so a value can never end
//! its literal early and change the meaning of the query.

use std::fmt;

/// MIME type the ROM content filter selects.
pub const ROM_MIME_TYPE: &str = "application/octet-stream";

/// Full-text patterns the ROM content filter selects.
pub const ROM_PATTERNS: [&str; 2] = ["*.gb", "*.gbc"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    FullTextContains(String),
    TitleEquals(String),
    MimeTypeEquals(String),
    InParents(String),
    Trashed(bool),
    All(Vec<Filter>),
    Any(Vec<Filter>),
}

impl Filter {
    pub fn full_text_contains(text: impl Into<String>) -> Self {
        Filter::FullTextContains(text.into())
    }

    pub fn title_equals(title: impl Into<String>) -> Self {
        Filter::TitleEquals(title.into())
    }

    pub fn mime_type_equals(mime_type: impl Into<String>) -> Self {
        Filter::MimeTypeEquals(mime_type.into())
    }

    pub fn in_parents(parent: impl Into<String>) -> Self {
        Filter::InParents(parent.into())
    }

    pub fn trashed(trashed: bool) -> Self {
        Filter::Trashed(trashed)
    }

    pub fn all(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::All(filters.into_iter().collect())
    }

    pub fn any(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Any(filters.into_iter().collect())
    }

    /// Untrashed octet-stream files whose full text mentions a Game Boy ROM
    /// extension.
    pub fn rom_files() -> Self {
        Filter::all([
            Filter::any(ROM_PATTERNS.iter().map(|p| Filter::full_text_contains(*p))),
            Filter::trashed(false),
            Filter::mime_type_equals(ROM_MIME_TYPE),
        ])
    }

    /// Untrashed file with exactly `title` directly inside `parent`.
    pub fn titled_in(parent: impl Into<String>, title: impl Into<String>) -> Self {
        Filter::all([
            Filter::trashed(false),
            Filter::in_parents(parent),
            Filter::title_equals(title),
        ])
    }

    fn is_compound(&self) -> bool {
        matches!(self, Filter::All(_) | Filter::Any(_))
    }

    fn write_joined(f: &mut fmt::Formatter<'_>, filters: &[Filter], op: &str) -> fmt::Result {
        for (index, filter) in filters.iter().enumerate() {
            if index > 0 {
                write!(f, " {} ", op)?;
            }
            if filter.is_compound() {
                write!(f, "({})", filter)?;
            } else {
                write!(f, "{}", filter)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::FullTextContains(text) => write!(f, "fullText contains {}", literal(text)),
            Filter::TitleEquals(title) => write!(f, "title = {}", literal(title)),
            Filter::MimeTypeEquals(mime) => write!(f, "mimeType = {}", literal(mime)),
            Filter::InParents(parent) => write!(f, "{} in parents", literal(parent)),
            Filter::Trashed(trashed) => write!(f, "trashed = {}", trashed),
            Filter::All(filters) => Filter::write_joined(f, filters, "and"),
            Filter::Any(filters) => Filter::write_joined(f, filters, "or"),
        }
    }
}

/// Quote `value` as a query string literal.
fn literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\\' || ch == '\'' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('\'');
    quoted
}
