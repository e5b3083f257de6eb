//! # Session Authorizer
//!
//! Silent ("immediate") authorization through the provider SDK, shared by
//! every concurrent caller.
//!
//! ## Overview
//!
//! At most one authorization attempt exists per session. Callers arriving
//! while it is in flight await the same shared future and observe the same
//! outcome, so the SDK is asked exactly once.
//!
//! - A successful attempt stays cached until its token is about to expire,
//!   after which the next caller starts a fresh attempt.
//! - A failed attempt removes itself from the slot, but only if the slot
//!   still holds that same attempt, so a newer attempt is never discarded.

use crate::error::{AuthError, Result};
use crate::loader::SdkLoader;
use crate::state::StateTracker;
use crate::types::{Authorization, SessionState};
use bridge_traits::{AuthorizeRequest, Clock, DriveSdk};
use core_runtime::config::ClientConfig;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

type SharedAuthorization = Shared<BoxFuture<'static, Result<Authorization>>>;

struct PendingAuthorization {
    attempt: u64,
    future: SharedAuthorization,
}

pub struct Authorizer {
    inner: Arc<AuthorizerInner>,
}

struct AuthorizerInner {
    loader: Arc<SdkLoader>,
    sdk: Arc<dyn DriveSdk>,
    clock: Arc<dyn Clock>,
    state: Arc<StateTracker>,
    auth_timeout: Duration,
    expiry_buffer: Duration,
    pending: Mutex<Option<PendingAuthorization>>,
    attempts: AtomicU64,
}

impl Authorizer {
    pub fn new(config: &ClientConfig, loader: Arc<SdkLoader>, state: Arc<StateTracker>) -> Self {
        Self {
            inner: Arc::new(AuthorizerInner {
                loader,
                sdk: config.sdk.clone(),
                clock: config.clock.clone(),
                state,
                auth_timeout: config.auth_timeout,
                expiry_buffer: config.token_expiry_buffer,
                pending: Mutex::new(None),
                attempts: AtomicU64::new(0),
            }),
        }
    }

    /// Join the current authorization attempt, starting one if needed.
    #[instrument(skip(self))]
    pub async fn authorize(&self) -> Result<Authorization> {
        info!("Checking authentication");

        let future = {
            let mut pending = self.inner.pending.lock().await;

            match pending.as_ref() {
                Some(current) if !self.inner.is_stale(current) => {
                    debug!(attempt = current.attempt, "Joining existing authorization");
                    current.future.clone()
                }
                _ => {
                    let attempt = self.inner.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    debug!(attempt, "Starting authorization attempt");

                    let future = AuthorizerInner::attempt(self.inner.clone(), attempt)
                        .boxed()
                        .shared();
                    *pending = Some(PendingAuthorization {
                        attempt,
                        future: future.clone(),
                    });
                    future
                }
            }
        };

        future.await
    }

    /// Number of attempts started so far.
    pub fn attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::SeqCst)
    }
}

impl AuthorizerInner {
    /// A settled success whose token is inside the expiry buffer.
    fn is_stale(&self, pending: &PendingAuthorization) -> bool {
        match pending.future.peek() {
            Some(Ok(authorization)) => {
                let buffer = i64::try_from(self.expiry_buffer.as_secs()).unwrap_or(i64::MAX);
                authorization.expires_within(self.clock.now(), buffer)
            }
            _ => false,
        }
    }

    async fn attempt(self: Arc<Self>, attempt: u64) -> Result<Authorization> {
        let outcome = self.request_authorization().await;

        match &outcome {
            Ok(_) => {
                info!(attempt, "Authorized");
                self.state.transition(SessionState::Ready);
            }
            Err(error) => {
                warn!(attempt, error = %error, "Failed to authorize");
                {
                    let mut pending = self.pending.lock().await;
                    if pending.as_ref().map(|p| p.attempt) == Some(attempt) {
                        *pending = None;
                    }
                }
                self.state.transition(SessionState::Unauthorized);
            }
        }

        outcome
    }

    async fn request_authorization(&self) -> Result<Authorization> {
        let settings = self.loader.load().await?;
        debug!("SDK ready, authorizing");

        self.state.transition(SessionState::Authenticating);

        let request = AuthorizeRequest {
            client_id: settings.client_id.clone(),
            scopes: settings.scopes.clone(),
            immediate: true,
        };

        let result = tokio::time::timeout(self.auth_timeout, self.sdk.authorize(request))
            .await
            .map_err(|_| AuthError::Timeout {
                operation: "authorize".to_string(),
            })?;

        match result {
            Some(result) => match result.error.clone() {
                None => Ok(Authorization::from(result)),
                Some(error) => Err(AuthError::AuthorizationFailed(error)),
            },
            None => Err(AuthError::AuthorizationFailed(
                "SDK returned no result".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{
        AccessToken, AuthorizeResult, HostPage, HttpClient, HttpRequest, HttpResponse,
        NetworkMonitor, NetworkStatus, ScriptTag,
    };
    use chrono::{DateTime, Utc};
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;

    struct SettingsHttp;

    #[async_trait]
    impl HttpClient for SettingsHttp {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: bytes::Bytes::from_static(
                    br#"{"client_id":"cid","scopes":"drive","client_secret":"s","redirect_uri":"https://app.example/"}"#,
                ),
            })
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

    /// Replays scripted authorize outcomes, yielding first so concurrent
    /// callers pile up behind the attempt.
    #[derive(Default)]
    struct ScriptedSdk {
        outcomes: StdMutex<VecDeque<Option<AuthorizeResult>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSdk {
        fn with(outcomes: Vec<Option<AuthorizeResult>>) -> Self {
            Self {
                outcomes: StdMutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DriveSdk for ScriptedSdk {
        async fn authorize(&self, request: AuthorizeRequest) -> Option<AuthorizeResult> {
            assert!(request.immediate);
            assert_eq!(request.client_id, "cid");
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.outcomes.lock().unwrap().pop_front().flatten()
        }

        fn set_token(&self, _token: AccessToken) {}

        fn token(&self) -> Option<AccessToken> {
            None
        }
    }

    struct ManualClock(StdMutex<DateTime<Utc>>);

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    /// Holds every authorize call open until a permit is added, then fails.
    struct GatedSdk {
        gate: tokio::sync::Semaphore,
        calls: AtomicUsize,
    }

    impl GatedSdk {
        fn closed() -> Self {
            Self {
                gate: tokio::sync::Semaphore::new(0),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DriveSdk for GatedSdk {
        async fn authorize(&self, _request: AuthorizeRequest) -> Option<AuthorizeResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
            Some(AuthorizeResult::failed("immediate_failed"))
        }

        fn set_token(&self, _token: AccessToken) {}

        fn token(&self) -> Option<AccessToken> {
            None
        }
    }

    fn setup(
        sdk: Arc<dyn DriveSdk>,
        clock: Arc<ManualClock>,
    ) -> (Authorizer, Arc<SdkLoader>, Arc<StateTracker>) {
        let config = ClientConfig::builder()
            .http_client(Arc::new(SettingsHttp))
            .network_monitor(Arc::new(Online))
            .page(Arc::new(BlankPage))
            .sdk(sdk)
            .clock(clock)
            .token_expiry_buffer(Duration::from_secs(60))
            .build()
            .unwrap();
        let state = Arc::new(StateTracker::new());
        let loader = Arc::new(SdkLoader::new(&config, state.clone()));
        let authorizer = Authorizer::new(&config, loader.clone(), state.clone());
        (authorizer, loader, state)
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock(StdMutex::new(Utc::now())))
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_attempt() {
        let sdk = Arc::new(ScriptedSdk::with(vec![Some(AuthorizeResult::granted(
            "tok", None,
        ))]));
        let (authorizer, loader, state) = setup(sdk.clone(), clock());
        let _ = loader.load();
        loader.did_load_sdk();

        let results = futures::future::join_all((0..5).map(|_| authorizer.authorize())).await;

        assert_eq!(sdk.calls.load(Ordering::SeqCst), 1);
        assert_eq!(authorizer.attempts(), 1);
        for result in results {
            assert_eq!(result.unwrap().access_token.as_deref(), Some("tok"));
        }
        assert_eq!(state.current(), SessionState::Ready);

        // Success stays cached.
        authorizer.authorize().await.unwrap();
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_shared_then_cleared() {
        let sdk = Arc::new(ScriptedSdk::with(vec![
            Some(AuthorizeResult::failed("immediate_failed")),
            Some(AuthorizeResult::granted("tok", None)),
        ]));
        let (authorizer, loader, state) = setup(sdk.clone(), clock());
        let _ = loader.load();
        loader.did_load_sdk();

        let (a, b) = futures::join!(authorizer.authorize(), authorizer.authorize());
        assert_eq!(
            a.unwrap_err(),
            AuthError::AuthorizationFailed("immediate_failed".to_string())
        );
        assert!(b.is_err());
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.current(), SessionState::Unauthorized);

        // The failed attempt cleared itself, so a new one runs.
        authorizer.authorize().await.unwrap();
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.current(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_missing_result_is_failure() {
        let sdk = Arc::new(ScriptedSdk::with(vec![None]));
        let (authorizer, loader, _state) = setup(sdk, clock());
        let _ = loader.load();
        loader.did_load_sdk();

        assert!(matches!(
            authorizer.authorize().await,
            Err(AuthError::AuthorizationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_expiring_authorization_is_renewed() {
        let clock = clock();
        let now = clock.now();
        let sdk = Arc::new(ScriptedSdk::with(vec![
            Some(AuthorizeResult::granted(
                "first",
                Some(now + chrono::Duration::minutes(10)),
            )),
            Some(AuthorizeResult::granted("second", None)),
        ]));
        let (authorizer, loader, _state) = setup(sdk.clone(), clock.clone());
        let _ = loader.load();
        loader.did_load_sdk();

        let first = authorizer.authorize().await.unwrap();
        assert_eq!(first.access_token.as_deref(), Some("first"));

        // Still well before expiry: cached.
        authorizer.authorize().await.unwrap();
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 1);

        // Inside the 60s buffer: renewed.
        *clock.0.lock().unwrap() = now + chrono::Duration::seconds(560);
        let renewed = authorizer.authorize().await.unwrap();
        assert_eq!(renewed.access_token.as_deref(), Some("second"));
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_late_failure_keeps_newer_attempt() {
        let sdk = Arc::new(GatedSdk::closed());
        let (authorizer, loader, _state) = setup(sdk.clone(), clock());
        let _ = loader.load();
        loader.did_load_sdk();

        let failing = authorizer.authorize();
        let replace = async {
            while sdk.calls.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }

            let newer = Authorization {
                access_token: Some("newer".to_string()),
                expires_at: None,
            };
            *authorizer.inner.pending.lock().await = Some(PendingAuthorization {
                attempt: 99,
                future: futures::future::ready(Ok::<_, AuthError>(newer)).boxed().shared(),
            });

            sdk.gate.add_permits(1);
        };

        let (result, ()) = futures::join!(failing, replace);
        assert_eq!(
            result.unwrap_err(),
            AuthError::AuthorizationFailed("immediate_failed".to_string())
        );

        assert_eq!(
            authorizer.inner.pending.lock().await.as_ref().map(|p| p.attempt),
            Some(99)
        );
        let cached = authorizer.authorize().await.unwrap();
        assert_eq!(cached.access_token.as_deref(), Some("newer"));
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 1);
    }
}
