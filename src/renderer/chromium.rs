//! Chromium-based renderer using chromiumoxide.
//!
//! One isolated headless Chromium is launched per render and torn down on
//! every exit path, so a failed navigation never leaks a browser process.

use super::{assets, RenderedPage, Renderer, SessionCookie};
use crate::error::RenderError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

/// How long network activity must stay flat before the DOM is read.
const SETTLE_WINDOW_MS: u64 = 500;

/// Poll interval while waiting for quiescence.
const IDLE_POLL_MS: u64 = 100;

/// Default upper bound on the quiescence wait; never exceeds the navigation
/// timeout.
const IDLE_BUDGET_MS: u64 = 10_000;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. PAGEMIRROR_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("PAGEMIRROR_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.pagemirror/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".pagemirror/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".pagemirror/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".pagemirror/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".pagemirror/chromium/chrome-linux64/chrome"),
                home.join(".pagemirror/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-based renderer. Holds configuration only; the browser itself is
/// scoped to a single [`Renderer::render`] call.
pub struct ChromiumRenderer {
    navigation_timeout_ms: u64,
    settle_window_ms: u64,
}

impl ChromiumRenderer {
    pub fn new(navigation_timeout_ms: u64) -> Self {
        Self {
            navigation_timeout_ms,
            settle_window_ms: SETTLE_WINDOW_MS,
        }
    }

    pub fn with_settle_window(mut self, settle_window_ms: u64) -> Self {
        self.settle_window_ms = settle_window_ms;
        self
    }

    /// Quiescence wait budget: the default cap, bounded by the configured
    /// navigation timeout.
    fn idle_budget_ms(&self) -> u64 {
        IDLE_BUDGET_MS.min(self.navigation_timeout_ms)
    }

    async fn launch(&self) -> Result<(Browser, JoinHandle<()>), RenderError> {
        let chrome_path = find_chromium().ok_or_else(|| {
            RenderError::Launch(
                "Chromium not found. Set PAGEMIRROR_CHROMIUM_PATH or install Chrome.".to_string(),
            )
        })?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        // Drive the CDP event stream until the browser goes away.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok((browser, handler_task))
    }

    async fn render_in(&self, browser: &Browser, url: &str) -> Result<RenderedPage, RenderError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Launch(format!("failed to create page: {e}")))?;

        let navigation = tokio::time::timeout(
            Duration::from_millis(self.navigation_timeout_ms),
            page.goto(url),
        )
        .await;

        match navigation {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(RenderError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(RenderError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.navigation_timeout_ms,
                })
            }
        }

        let _ = page.wait_for_navigation().await;
        self.wait_for_network_idle(&page).await;

        let html: String = page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| RenderError::Serialize(e.to_string()))?
            .into_value()
            .map_err(|e| RenderError::Serialize(format!("{e:?}")))?;

        let final_url = page
            .url()
            .await
            .unwrap_or_default()
            .map(|u| u.to_string())
            .unwrap_or_else(|| url.to_string());

        let cookies: Vec<SessionCookie> = page
            .get_cookies()
            .await
            .map(|cookies| {
                cookies
                    .into_iter()
                    .map(|c| SessionCookie {
                        name: c.name,
                        value: c.value,
                        domain: c.domain,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let asset_urls = assets::extract_asset_urls(&html, &final_url);
        debug!(
            "rendered {url}: {} bytes of HTML, {} asset references, {} cookies",
            html.len(),
            asset_urls.len(),
            cookies.len()
        );

        let _ = page.close().await;

        Ok(RenderedPage {
            html,
            final_url,
            asset_urls,
            cookies,
        })
    }

    /// Wait until the page's resource timeline stops growing for a full
    /// settle window (and the document reports itself complete), bounded by
    /// the idle budget. Asynchronously injected resources land in the DOM
    /// before this returns.
    async fn wait_for_network_idle(&self, page: &Page) {
        let deadline = Instant::now() + Duration::from_millis(self.idle_budget_ms());
        let mut last_count: i64 = -1;
        let mut stable_since = Instant::now();

        loop {
            let count = page
                .evaluate("performance.getEntriesByType('resource').length")
                .await
                .ok()
                .and_then(|v| v.into_value::<i64>().ok())
                .unwrap_or(-1);
            let complete = page
                .evaluate("document.readyState")
                .await
                .ok()
                .and_then(|v| v.into_value::<String>().ok())
                .map(|state| state == "complete")
                .unwrap_or(false);

            if count == last_count && complete {
                if stable_since.elapsed() >= Duration::from_millis(self.settle_window_ms) {
                    return;
                }
            } else {
                last_count = count;
                stable_since = Instant::now();
            }

            if Instant::now() >= deadline {
                debug!("network idle budget exhausted, reading DOM anyway");
                return;
            }
            tokio::time::sleep(Duration::from_millis(IDLE_POLL_MS)).await;
        }
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let (mut browser, handler_task) = self.launch().await?;

        let result = self.render_in(&browser, url).await;

        // Release the browser on every path, success or not.
        let _ = browser.close().await;
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_budget_never_exceeds_the_navigation_timeout() {
        assert_eq!(ChromiumRenderer::new(1_000).idle_budget_ms(), 1_000);
        assert_eq!(ChromiumRenderer::new(60_000).idle_budget_ms(), IDLE_BUDGET_MS);
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn render_data_url() {
        let renderer = ChromiumRenderer::new(10_000);
        let page = renderer
            .render(r#"data:text/html,<h1>Hello</h1><img src="">"#)
            .await
            .expect("render failed");

        assert!(page.html.contains("<h1>Hello</h1>"));
        // Empty src plus a non-http base: nothing to fetch.
        assert!(page.asset_urls.is_empty());
    }
}
