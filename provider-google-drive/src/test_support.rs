//! Shared fixtures for connector and downloader tests.

use crate::connector::GoogleDriveConnector;
use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    AccessToken, AuthorizeRequest, AuthorizeResult, DriveSdk, HostPage, HttpClient, HttpRequest,
    HttpResponse, NetworkMonitor, NetworkStatus, ScriptTag,
};
use bytes::Bytes;
use core_auth::{Authorizer, SdkLoader, StateTracker};
use core_runtime::config::ClientConfig;
use mockall::mock;
use std::collections::HashMap;
use std::sync::Arc;

pub const SETTINGS_URL: &str = "https://app.example/settings.json";
pub const LIST_URL: &str = "https://www.googleapis.com/drive/v2/files?";
pub const SDK_TOKEN: &str = "ya29.sdk";

mock! {
    pub Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

struct Online;

#[async_trait]
impl NetworkMonitor for Online {
    async fn status(&self) -> BridgeResult<NetworkStatus> {
        Ok(NetworkStatus::Connected)
    }
}

struct BlankPage;

impl HostPage for BlankPage {
    fn location(&self) -> String {
        "https://app.example/".to_string()
    }

    fn has_element(&self, _id: &str) -> bool {
        false
    }

    fn inject_script(&self, _script: ScriptTag) -> BridgeResult<()> {
        Ok(())
    }

    fn navigate(&self, _url: &str) -> BridgeResult<()> {
        Ok(())
    }
}

/// Grants every immediate request; `token()` reports `SDK_TOKEN`.
pub struct GrantingSdk {
    pub grant: bool,
}

#[async_trait]
impl DriveSdk for GrantingSdk {
    async fn authorize(&self, _request: AuthorizeRequest) -> Option<AuthorizeResult> {
        if self.grant {
            Some(AuthorizeResult::granted("ya29.granted", None))
        } else {
            Some(AuthorizeResult::failed("immediate_failed"))
        }
    }

    fn set_token(&self, _token: AccessToken) {}

    fn token(&self) -> Option<AccessToken> {
        self.grant.then(|| AccessToken::new(SDK_TOKEN, None))
    }
}

pub fn json(status: u16, body: impl Into<String>) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from(body.into()),
    }
}

/// Answer the settings fetch the first authorization triggers.
pub fn expect_settings(http: &mut MockHttp) {
    http.expect_execute()
        .withf(|req| req.url == SETTINGS_URL)
        .times(1)
        .returning(|_| {
            Ok(json(
                200,
                r#"{"client_id":"cid","scopes":"drive","client_secret":"s","redirect_uri":"https://app.example/"}"#,
            ))
        });
}

/// Connector over `http` whose SDK has already signalled readiness.
pub fn connector(http: MockHttp, grant: bool) -> GoogleDriveConnector {
    let config = ClientConfig::builder()
        .http_client(Arc::new(http))
        .network_monitor(Arc::new(Online))
        .page(Arc::new(BlankPage))
        .sdk(Arc::new(GrantingSdk { grant }))
        .build()
        .unwrap();

    let state = Arc::new(StateTracker::new());
    let loader = Arc::new(SdkLoader::new(&config, state.clone()));
    let _ = loader.load();
    loader.did_load_sdk();

    let authorizer = Arc::new(Authorizer::new(&config, loader, state));
    GoogleDriveConnector::new(&config, authorizer)
}
