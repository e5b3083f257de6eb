//! Desktop walkthrough of a Drive session.
//!
//! ```text
//! cargo run -p core-service --example drive_demo -- [redirected-url]
//! ```
//!
//! `DRIVE_APP_URL` is the page the settings document is served next to
//! (default `http://localhost:8080/`). After approving access in the browser,
//! pass the URL the consent page redirected to so its `code` is redeemed.

use anyhow::Context;
use core_runtime::config::ClientConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::{HeadlessPage, NativeSdk, SessionRoot};
use std::sync::{Arc, Weak};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))
        .context("failed to initialize logging")?;

    let location = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DRIVE_APP_URL").ok())
        .unwrap_or_else(|| "http://localhost:8080/".to_string());

    let page = Arc::new(HeadlessPage::new(location));
    let root = SessionRoot::new();

    let session = root.get_or_create(|| {
        ClientConfig::builder()
            .page(page.clone())
            .sdk(Arc::new(NativeSdk::new()))
            .build()
    })?;

    // The native SDK is ready as soon as its tag lands in the page.
    let weak = Arc::downgrade(&session);
    page.on_script_injected(move |_| {
        if let Some(session) = Weak::upgrade(&weak) {
            session.did_load_sdk();
        }
    });

    session.on_state_change(|state| println!("session: {}", state));

    if let Err(e) = session.check_authentication().await {
        println!("not signed in ({})", e);
        session.sign_in().await?;
        if let Some(url) = page.navigations().last() {
            println!("open this URL to grant access:\n  {}", url);
        }
        return Ok(());
    }

    let roms = session.files().await?;
    println!("found {} ROMs", roms.len());
    for rom in &roms {
        println!("  {} ({})", rom.title, rom.id);
    }

    if let Some(first) = roms.first() {
        match session.download_file_base64(Some(first)).await {
            Some(encoded) => println!("{}: {} base64 chars", first.title, encoded.len()),
            None => println!("{}: download failed", first.title),
        }
    }

    Ok(())
}
