//! Capture engine: render a page, persist its DOM, fetch its assets.
//!
//! [`CaptureEngine::capture`] is the core operation. It renders the page
//! once, writes the root document as `index.html`, then walks the asset
//! references in discovery order, fetching each one sequentially with a
//! session-aware HTTP client and writing it under a flat basename-derived
//! filename. One bad resource never fails the whole capture; render,
//! directory, and root-write failures do.

pub mod filename;

use crate::error::{AssetError, CaptureError};
use crate::events::{CaptureEvent, EventBus};
use crate::fetch::{AssetFetcher, SessionClient};
use crate::renderer::Renderer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Default per-asset fetch timeout.
const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Immutable input for a single capture run.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Absolute http/https URL to capture.
    pub url: String,
    /// Directory the mirror is written into.
    pub output_dir: PathBuf,
}

impl CaptureRequest {
    /// Output directory used when the caller does not pick one.
    pub const DEFAULT_OUTPUT_DIR: &'static str = "./cloned-site";

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_dir: PathBuf::from(Self::DEFAULT_OUTPUT_DIR),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

/// Aggregate outcome of one capture run.
///
/// `success` reflects only whether the root document was rendered and
/// written; skipped assets reduce `total_files`/`total_size` versus the
/// discovered count without flipping it. With colliding basenames the
/// counters track write attempts, which can overstate the number of distinct
/// files left on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureResult {
    pub success: bool,
    pub local_path: String,
    pub url: String,
    pub total_files: u64,
    pub total_size: u64,
    pub duration_ms: u64,
}

impl CaptureResult {
    fn failed(url: &str, duration_ms: u64) -> Self {
        Self {
            success: false,
            local_path: String::new(),
            url: url.to_string(),
            total_files: 0,
            total_size: 0,
            duration_ms,
        }
    }
}

/// Orchestrates render, root persistence, and the sequential asset loop.
pub struct CaptureEngine {
    renderer: Arc<dyn Renderer>,
    events: EventBus,
    fetch_timeout_ms: u64,
}

impl CaptureEngine {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            events: EventBus::new(),
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout_ms: u64) -> Self {
        self.fetch_timeout_ms = timeout_ms;
        self
    }

    /// Subscribe to progress events for runs executed by this engine.
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureEvent> {
        self.events.subscribe()
    }

    /// Run one capture. Never returns an error: fatal failures (render,
    /// output directory, root write) become a `success: false` result with
    /// zero counters, and per-asset failures are skipped.
    pub async fn capture(&self, request: &CaptureRequest) -> CaptureResult {
        let start = Instant::now();
        info!("starting capture of {}", request.url);
        self.events.emit(CaptureEvent::CaptureStarted {
            url: request.url.clone(),
        });

        match self.try_capture(request, start).await {
            Ok(result) => {
                info!(
                    "capture of {} complete: {} files, {} bytes in {}ms",
                    request.url, result.total_files, result.total_size, result.duration_ms
                );
                self.events.emit(CaptureEvent::CaptureFinished {
                    total_files: result.total_files,
                    total_size: result.total_size,
                    duration_ms: result.duration_ms,
                });
                result
            }
            Err(e) => {
                warn!("capture of {} failed: {e}", request.url);
                self.events.emit(CaptureEvent::CaptureFailed {
                    url: request.url.clone(),
                    error: e.to_string(),
                });
                CaptureResult::failed(&request.url, start.elapsed().as_millis() as u64)
            }
        }
    }

    async fn try_capture(
        &self,
        request: &CaptureRequest,
        start: Instant,
    ) -> Result<CaptureResult, CaptureError> {
        tokio::fs::create_dir_all(&request.output_dir)
            .await
            .map_err(|source| CaptureError::Directory {
                path: request.output_dir.display().to_string(),
                source,
            })?;

        let page = self.renderer.render(&request.url).await?;

        let index_path = request.output_dir.join("index.html");
        tokio::fs::write(&index_path, page.html.as_bytes())
            .await
            .map_err(|source| CaptureError::RootWrite {
                path: index_path.display().to_string(),
                source,
            })?;

        let mut total_files: u64 = 1;
        let mut total_size: u64 = page.html.len() as u64;

        info!("found {} asset references", page.asset_urls.len());
        self.events.emit(CaptureEvent::PageRendered {
            url: request.url.clone(),
            asset_count: page.asset_urls.len(),
        });

        let fetcher = SessionClient::new(page.cookies.clone(), self.fetch_timeout_ms);
        for asset_url in &page.asset_urls {
            match self
                .fetch_and_store(&fetcher, asset_url, &request.output_dir)
                .await
            {
                Ok(written) => {
                    total_files += 1;
                    total_size += written;
                    self.events.emit(CaptureEvent::AssetFetched {
                        url: asset_url.clone(),
                        bytes: written,
                    });
                }
                Err(e) => {
                    warn!("skipping {asset_url}: {e}");
                    self.events.emit(CaptureEvent::AssetSkipped {
                        url: asset_url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(CaptureResult {
            success: true,
            local_path: request.output_dir.display().to_string(),
            url: request.url.clone(),
            total_files,
            total_size,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Fetch one asset and write it under its derived flat filename.
    /// Returns the number of bytes written.
    async fn fetch_and_store(
        &self,
        fetcher: &dyn AssetFetcher,
        url: &str,
        output_dir: &Path,
    ) -> Result<u64, AssetError> {
        let asset = fetcher.fetch(url).await?;

        let name = filename::derive_filename(url);
        let path = output_dir.join(&name);
        tokio::fs::write(&path, &asset.body)
            .await
            .map_err(|source| AssetError::Write {
                path: path.display().to_string(),
                source,
            })?;

        debug!("wrote {} ({} bytes)", path.display(), asset.body.len());
        Ok(asset.body.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_the_fixed_output_dir() {
        let request = CaptureRequest::new("https://example.com");
        assert_eq!(
            request.output_dir,
            PathBuf::from(CaptureRequest::DEFAULT_OUTPUT_DIR)
        );
    }

    #[test]
    fn failed_result_has_empty_path_and_zero_counters() {
        let result = CaptureResult::failed("https://example.com", 12);
        assert!(!result.success);
        assert_eq!(result.local_path, "");
        assert_eq!(result.total_files, 0);
        assert_eq!(result.total_size, 0);
        assert_eq!(result.duration_ms, 12);
    }
}
