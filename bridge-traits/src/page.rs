//! Host Page Abstraction
//!
//! The document the client lives in: its current location, the elements it
//! already carries, script injection and full-page navigation.

use crate::error::Result;

/// A script element to insert into the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    /// Element identifier, used to detect an earlier injection
    pub id: String,
    /// Script source URL
    pub src: String,
    /// Whether the script loads asynchronously
    pub is_async: bool,
}

impl ScriptTag {
    pub fn new(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            is_async: true,
        }
    }
}

/// Host page trait
///
/// DOM-style operations are synchronous; anything the page does in response
/// (such as a script announcing it finished loading) comes back through the
/// session's own entry points.
///
/// # Platform Support
///
/// - **Web**: `window.location` and `document` script insertion
/// - **Desktop**: a headless page that records injections and navigations
pub trait HostPage: Send + Sync {
    /// Absolute URL of the current location, including any query string
    fn location(&self) -> String;

    /// Whether an element with `id` already exists in the document
    fn has_element(&self, id: &str) -> bool;

    /// Insert a script element ahead of the document's first script
    fn inject_script(&self, script: ScriptTag) -> Result<()>;

    /// Replace the current location with `url`
    fn navigate(&self, url: &str) -> Result<()>;
}
