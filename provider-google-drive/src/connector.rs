//! Google Drive API connector
//!
//! Runs authorized listings against the Drive v2 `files` endpoint and fetches
//! file content from a resource's `downloadUrl`.
//!
//! Every public operation authorizes first, so a cold session loads the SDK
//! and runs its single shared authorization before the first request goes
//! out. Requests are made exactly once; failures are reported, never retried.

use bridge_traits::{DriveSdk, HttpClient, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_auth::{AuthError, Authorizer};
use core_runtime::config::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{GoogleDriveError, Result};
use crate::query::Filter;
use crate::types::{DriveFile, FilesPage};

/// Page size used when listing every ROM
pub const LIST_PAGE_SIZE: u32 = 100;

/// Google Drive API connector
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveConnector;
///
/// let connector = GoogleDriveConnector::new(&config, authorizer);
/// let roms = connector.files().await?;
/// let save = connector.file("root", "tetris.sav").await?;
/// ```
pub struct GoogleDriveConnector {
    http_client: Arc<dyn HttpClient>,
    sdk: Arc<dyn DriveSdk>,
    authorizer: Arc<Authorizer>,
    api_base: String,
    request_timeout: Duration,
}

impl GoogleDriveConnector {
    pub fn new(config: &ClientConfig, authorizer: Arc<Authorizer>) -> Self {
        Self {
            http_client: config.http_client.clone(),
            sdk: config.sdk.clone(),
            authorizer,
            api_base: config.endpoints.api_base.clone(),
            request_timeout: config.request_timeout,
        }
    }

    /// Authorize, then resolve the bearer token for API requests.
    ///
    /// The SDK's auth state wins; the token carried by the authorization
    /// result is the fallback.
    pub async fn access_token(&self) -> Result<String> {
        let authorization = self.authorizer.authorize().await?;

        self.sdk
            .token()
            .map(|token| token.access_token)
            .or(authorization.access_token)
            .ok_or_else(|| {
                AuthError::AuthorizationFailed("no access token in auth state".to_string()).into()
            })
    }

    /// Every untrashed ROM file, in server order across all pages.
    #[instrument(skip(self))]
    pub async fn files(&self) -> Result<Vec<DriveFile>> {
        let token = self.access_token().await?;
        let filter = Filter::rom_files();

        info!("Listing ROM files from Google Drive");

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self
                .list_page(&token, &filter, LIST_PAGE_SIZE, page_token.as_deref())
                .await?;
            pages += 1;

            let items = page
                .items
                .ok_or_else(|| GoogleDriveError::QueryFailed("page has no items".to_string()))?;
            debug!(page = pages, count = items.len(), "Received page");
            files.extend(items);

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        info!(count = files.len(), pages, "Listed ROM files");
        Ok(files)
    }

    /// First untrashed file titled exactly `title` directly inside `parent`.
    #[instrument(skip(self))]
    pub async fn file(&self, parent: &str, title: &str) -> Result<DriveFile> {
        let token = self.access_token().await?;
        let filter = Filter::titled_in(parent, title);

        let page = self.list_page(&token, &filter, 1, None).await?;
        let items = page
            .items
            .ok_or_else(|| GoogleDriveError::QueryFailed("page has no items".to_string()))?;

        items
            .into_iter()
            .next()
            .ok_or_else(|| GoogleDriveError::ResourceNotFound {
                parent: parent.to_string(),
                title: title.to_string(),
            })
    }

    /// Fetch a single listing page.
    #[instrument(skip(self, token, filter), fields(filter = %filter))]
    pub async fn list_page(
        &self,
        token: &str,
        filter: &Filter,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<FilesPage> {
        let mut url = format!(
            "{}/files?maxResults={}&q={}",
            self.api_base,
            max_results,
            urlencoding::encode(&filter.to_string())
        );

        if let Some(page_token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(page_token)));
        }

        let response = self
            .get(&url, token)
            .await
            .map_err(GoogleDriveError::QueryFailed)?;

        serde_json::from_slice(&response.body).map_err(|e| {
            GoogleDriveError::QueryFailed(format!("Failed to parse files list response: {}", e))
        })
    }

    /// GET `url` with the bearer token and return the body verbatim.
    #[instrument(skip(self, token, url))]
    pub async fn fetch_content(&self, token: &str, url: &str) -> Result<Bytes> {
        let response = self
            .get(url, token)
            .await
            .map_err(GoogleDriveError::DownloadFailed)?;

        debug!(bytes = response.body.len(), "Fetched content");
        Ok(response.body)
    }

    async fn get(&self, url: &str, token: &str) -> std::result::Result<HttpResponse, String> {
        let request = HttpRequest::get(url)
            .bearer_token(token)
            .timeout(self.request_timeout);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            let status = response.status;
            warn!(status, "Drive request failed");
            return Err(format!(
                "status {}: {}",
                status,
                String::from_utf8_lossy(&response.body)
            ));
        }

        Ok(response)
    }
}
