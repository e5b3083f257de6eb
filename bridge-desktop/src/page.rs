//! Headless Host Page
//!
//! A document without a renderer. Injections and navigations are recorded so
//! the embedding application can act on them (open a browser, load the SDK
//! natively) and report back through the session.

use bridge_traits::{
    error::{BridgeError, Result},
    page::{HostPage, ScriptTag},
};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

type InjectionHook = Arc<dyn Fn(&ScriptTag) + Send + Sync>;

/// In-memory [`HostPage`] for desktop and test hosts.
pub struct HeadlessPage {
    location: RwLock<String>,
    elements: RwLock<HashSet<String>>,
    injected: RwLock<Vec<ScriptTag>>,
    navigations: RwLock<Vec<String>>,
    on_injected: RwLock<Option<InjectionHook>>,
}

impl HeadlessPage {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: RwLock::new(location.into()),
            elements: RwLock::new(HashSet::new()),
            injected: RwLock::new(Vec::new()),
            navigations: RwLock::new(Vec::new()),
            on_injected: RwLock::new(None),
        }
    }

    /// Replace the current location, e.g. after the consent redirect lands.
    pub fn set_location(&self, location: impl Into<String>) {
        if let Ok(mut guard) = self.location.write() {
            *guard = location.into();
        }
    }

    /// Mark an element as already present in the document.
    pub fn add_element(&self, id: impl Into<String>) {
        if let Ok(mut guard) = self.elements.write() {
            guard.insert(id.into());
        }
    }

    /// Scripts injected so far, in order.
    pub fn injected_scripts(&self) -> Vec<ScriptTag> {
        self.injected
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// URLs navigated to so far, in order.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Run `hook` after every successful script injection.
    ///
    /// Hosts that load the SDK natively use this to learn when to announce
    /// that the SDK is ready.
    pub fn on_script_injected<F>(&self, hook: F)
    where
        F: Fn(&ScriptTag) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.on_injected.write() {
            *guard = Some(Arc::new(hook));
        }
    }

    fn poisoned(what: &str) -> BridgeError {
        BridgeError::OperationFailed(format!("{} lock poisoned", what))
    }
}

impl HostPage for HeadlessPage {
    fn location(&self) -> String {
        self.location
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements
            .read()
            .map(|guard| guard.contains(id))
            .unwrap_or(false)
    }

    fn inject_script(&self, script: ScriptTag) -> Result<()> {
        debug!(id = %script.id, src = %script.src, "Injecting script");

        self.elements
            .write()
            .map_err(|_| Self::poisoned("elements"))?
            .insert(script.id.clone());
        self.injected
            .write()
            .map_err(|_| Self::poisoned("injected"))?
            .push(script.clone());

        let hook = self
            .on_injected
            .read()
            .map_err(|_| Self::poisoned("hook"))?
            .clone();
        if let Some(hook) = hook {
            hook(&script);
        }

        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<()> {
        info!(url = %url, "Navigating host page");
        self.navigations
            .write()
            .map_err(|_| Self::poisoned("navigations"))?
            .push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_location_roundtrip() {
        let page = HeadlessPage::new("https://app.example/");
        assert_eq!(page.location(), "https://app.example/");

        page.set_location("https://app.example/?code=abc");
        assert_eq!(page.location(), "https://app.example/?code=abc");
    }

    #[test]
    fn test_inject_records_element_and_runs_hook() {
        let page = HeadlessPage::new("https://app.example/");
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        page.on_script_injected(move |tag| {
            assert_eq!(tag.id, "sdk");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!page.has_element("sdk"));
        page.inject_script(ScriptTag::new("sdk", "https://cdn.example/sdk.js"))
            .unwrap();

        assert!(page.has_element("sdk"));
        assert_eq!(page.injected_scripts().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_navigate_is_recorded() {
        let page = HeadlessPage::new("https://app.example/");
        page.navigate("https://accounts.example/auth").unwrap();
        page.navigate("https://accounts.example/auth?again").unwrap();

        assert_eq!(
            page.navigations(),
            vec![
                "https://accounts.example/auth".to_string(),
                "https://accounts.example/auth?again".to_string()
            ]
        );
    }
}
