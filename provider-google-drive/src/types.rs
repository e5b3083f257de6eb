//! Google Drive API response types
//!
//! Data structures for deserializing Google Drive API v2 responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Google Drive API v2 file resource
///
/// Only the fields the client acts on are typed; every other field the API
/// returns is retained verbatim in `extra` and written back on serialization.
///
/// See: https://developers.google.com/drive/api/v2/reference/files#resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub mime_type: String,

    /// Authenticated content URL (absent for native Google documents)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Google Drive API v2 files.list response
///
/// See: https://developers.google.com/drive/api/v2/reference/files/list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesPage {
    /// Absent on a malformed page
    #[serde(default)]
    pub items: Option<Vec<DriveFile>>,

    /// Cursor for the next page; absent on the last page
    #[serde(default)]
    pub next_page_token: Option<String>,
}
