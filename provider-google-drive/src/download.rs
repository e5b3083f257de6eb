//! File downloads
//!
//! Downloads never fail loudly: every failure is logged against the
//! download's request id and reported as `None`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::connector::GoogleDriveConnector;
use crate::types::DriveFile;

pub struct FileDownloader {
    connector: Arc<GoogleDriveConnector>,
    request_ids: AtomicU64,
}

impl FileDownloader {
    pub fn new(connector: Arc<GoogleDriveConnector>) -> Self {
        Self {
            connector,
            request_ids: AtomicU64::new(0),
        }
    }

    /// Raw content of `file`, or `None` when it cannot be fetched.
    pub async fn download(&self, file: Option<&DriveFile>) -> Option<Bytes> {
        let request_id = self.request_ids.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(file) = file else {
            debug!(request_id, "No file to download");
            return None;
        };

        debug!(request_id, file_id = %file.id, "Starting download");

        let token = match self.connector.access_token().await {
            Ok(token) => token,
            Err(error) => {
                warn!(request_id, error = %error, "Download not authorized");
                return None;
            }
        };

        let Some(url) = file.download_url.as_deref() else {
            warn!(request_id, file_id = %file.id, "File has no download URL");
            return None;
        };

        match self.connector.fetch_content(&token, url).await {
            Ok(bytes) => {
                info!(request_id, bytes = bytes.len(), "Downloaded file");
                Some(bytes)
            }
            Err(error) => {
                warn!(request_id, error = %error, "Download failed");
                None
            }
        }
    }

    /// Content of `file` as standard padded base64.
    pub async fn download_base64(&self, file: Option<&DriveFile>) -> Option<String> {
        self.download(file).await.map(|bytes| encode(&bytes))
    }

    /// Ids handed out so far.
    pub fn requests(&self) -> u64 {
        self.request_ids.load(Ordering::SeqCst)
    }
}

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{connector, expect_settings, json, MockHttp, SDK_TOKEN};
    use bridge_traits::BridgeError;
    use serde_json::Map;

    const CONTENT_URL: &str = "https://doc-0.googleusercontent.com/rom";

    fn rom(download_url: Option<&str>) -> DriveFile {
        DriveFile {
            id: "rom1".to_string(),
            title: "tetris.gb".to_string(),
            mime_type: "application/octet-stream".to_string(),
            download_url: download_url.map(str::to_string),
            extra: Map::new(),
        }
    }

    fn downloader(http: MockHttp, grant: bool) -> FileDownloader {
        FileDownloader::new(Arc::new(connector(http, grant)))
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(&[0x00, 0xFF, 0x41]), "AP9B");
        assert_eq!(encode(b"a"), "YQ==");
        assert_eq!(encode(&[]), "");
    }

    #[tokio::test]
    async fn test_none_file_makes_no_request() {
        // No expectations: any request would panic.
        let downloader = downloader(MockHttp::new(), true);

        assert!(downloader.download(None).await.is_none());
        assert!(downloader.download_base64(None).await.is_none());
        assert_eq!(downloader.requests(), 2);
    }

    #[tokio::test]
    async fn test_download_returns_bytes_verbatim() {
        let mut http = MockHttp::new();
        expect_settings(&mut http);
        http.expect_execute()
            .withf(|req| {
                req.url == CONTENT_URL
                    && req.headers.get("Authorization").map(String::as_str)
                        == Some(&*format!("Bearer {}", SDK_TOKEN))
            })
            .times(2)
            .returning(|_| {
                Ok(bridge_traits::HttpResponse {
                    status: 200,
                    headers: Default::default(),
                    body: Bytes::from_static(&[0x00, 0xFF, 0x41]),
                })
            });

        let downloader = downloader(http, true);
        let file = rom(Some(CONTENT_URL));

        let bytes = downloader.download(Some(&file)).await.unwrap();
        assert_eq!(bytes.as_ref(), &[0x00, 0xFF, 0x41]);

        let encoded = downloader.download_base64(Some(&file)).await.unwrap();
        assert_eq!(encoded, "AP9B");
        assert_eq!(downloader.requests(), 2);
    }

    #[tokio::test]
    async fn test_missing_download_url() {
        let mut http = MockHttp::new();
        expect_settings(&mut http);

        assert!(downloader(http, true).download(Some(&rom(None))).await.is_none());
    }

    #[tokio::test]
    async fn test_failures_collapse_to_none() {
        let mut http = MockHttp::new();
        expect_settings(&mut http);
        http.expect_execute()
            .withf(|req| req.url == CONTENT_URL)
            .times(1)
            .returning(|_| Ok(json(404, "not found")));
        http.expect_execute()
            .withf(|req| req.url.ends_with("/broken"))
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("timed out".to_string())));

        let downloader = downloader(http, true);

        assert!(downloader.download(Some(&rom(Some(CONTENT_URL)))).await.is_none());
        assert!(downloader
            .download(Some(&rom(Some("https://doc.example/broken"))))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_download_is_none() {
        let mut http = MockHttp::new();
        expect_settings(&mut http);

        assert!(downloader(http, false)
            .download(Some(&rom(Some(CONTENT_URL))))
            .await
            .is_none());
    }
}
