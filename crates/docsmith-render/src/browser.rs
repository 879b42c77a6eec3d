//! Shared headless-browser session.
//!
//! One session owns at most one Chromium process. The handle is created by
//! the caller and passed down the pipeline explicitly; holding it across runs
//! preserves the process between generations (watch scenarios) without paying
//! the startup cost each time.

use std::path::PathBuf;

use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    page::Page,
};
use futures::StreamExt;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, warn};

use crate::error::{RenderError, Result};

/// An explicit handle to a shared headless-browser process.
///
/// `page()` launches the process lazily and opens a fresh page per task, so
/// concurrent renders share one process but never a page. `release()` tears
/// the process down; a later `page()` relaunches.
#[derive(Debug, Default)]
pub struct BrowserSession {
    inner: Mutex<Option<ActiveBrowser>>,
    executable: Option<PathBuf>,
}

#[derive(Debug)]
struct ActiveBrowser {
    browser: Browser,
    event_loop: JoinHandle<()>,
}

impl BrowserSession {
    /// Create a session with no running browser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session pinned to a specific browser executable instead of
    /// relying on auto-detection.
    #[must_use]
    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Mutex::new(None),
            executable: Some(path.into()),
        }
    }

    /// Whether a browser process is currently running.
    pub async fn is_active(&self) -> bool {
        self.inner.lock().await.is_some()
    }

    /// Open a new page, launching the browser if necessary.
    pub async fn page(&self) -> Result<Page> {
        let mut guard = self.inner.lock().await;
        let active = match guard.as_mut() {
            Some(active) => active,
            None => guard.insert(launch(self.executable.as_deref()).await?),
        };
        Ok(active.browser.new_page("about:blank").await?)
    }

    /// Close the browser process and clear the session.
    ///
    /// Close failures are logged, never surfaced: they would mask the
    /// primary result of the run. After release, the session is empty and a
    /// later `page()` starts a fresh process.
    pub async fn release(&self) {
        let mut guard = self.inner.lock().await;
        if let Some(mut active) = guard.take() {
            if let Err(e) = active.browser.close().await {
                warn!(error = %e, "failed to close browser");
            }
            let _ = active.browser.wait().await;
            active.event_loop.abort();
            debug!("browser session released");
        }
    }
}

async fn launch(executable: Option<&std::path::Path>) -> Result<ActiveBrowser> {
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .arg("--disable-setuid-sandbox");
    if let Some(path) = executable {
        builder = builder.chrome_executable(path);
    }
    let config = builder.build().map_err(RenderError::BrowserConfig)?;

    let (browser, mut handler) = Browser::launch(config).await?;

    // Drive CDP messages until the browser goes away.
    let event_loop = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    debug!("launched headless browser");
    Ok(ActiveBrowser {
        browser,
        event_loop,
    })
}
