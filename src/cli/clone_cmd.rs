//! `pagemirror clone <url>` — capture a page and optionally deploy it.

use crate::capture::{CaptureEngine, CaptureRequest, CaptureResult};
use crate::deploy::{Deployer, VercelDeployer};
use crate::events::CaptureEvent;
use crate::renderer::chromium::ChromiumRenderer;
use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Run the clone command. The URL scheme is validated here, before any
/// browser or engine work starts; a bad scheme exits non-zero without
/// invoking the core.
pub async fn run(url: &str, output: &str, timeout_ms: u64, deploy: bool, json: bool) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("URL must start with http:// or https://");
    }

    let renderer = Arc::new(ChromiumRenderer::new(timeout_ms));
    let engine = CaptureEngine::new(renderer);
    let request = CaptureRequest::new(url).with_output_dir(output);

    let progress = if json {
        None
    } else {
        Some(spawn_progress(engine.subscribe()))
    };

    let result = engine.capture(&request).await;

    if let Some(handle) = progress {
        let _ = handle.await;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if !result.success {
        bail!("capture of {url} failed");
    }

    if deploy {
        let deployer = VercelDeployer::new();
        match deployer.deploy(Path::new(&result.local_path)).await {
            Ok(deployment) => {
                println!("Live at {} ({})", deployment.url, deployment.domain);
            }
            Err(e) => {
                eprintln!("Deployment failed: {e}");
            }
        }
    }

    Ok(())
}

fn print_summary(result: &CaptureResult) {
    if result.success {
        println!(
            "Captured {} files ({:.2} KB) to {} in {:.2}s",
            result.total_files,
            result.total_size as f64 / 1024.0,
            result.local_path,
            result.duration_ms as f64 / 1000.0
        );
    } else {
        println!("Capture of {} failed", result.url);
    }
}

/// Draw a progress bar for the asset loop from engine events. The task ends
/// when the run finishes or fails.
fn spawn_progress(mut events: broadcast::Receiver<CaptureEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut bar: Option<ProgressBar> = None;
        while let Ok(event) = events.recv().await {
            match event {
                CaptureEvent::PageRendered { asset_count, .. } => {
                    let b = ProgressBar::new(asset_count as u64);
                    b.set_style(
                        ProgressStyle::with_template("  {bar:30} {pos}/{len} assets")
                            .unwrap_or_else(|_| ProgressStyle::default_bar()),
                    );
                    bar = Some(b);
                }
                CaptureEvent::AssetFetched { .. } | CaptureEvent::AssetSkipped { .. } => {
                    if let Some(b) = &bar {
                        b.inc(1);
                    }
                }
                CaptureEvent::CaptureFinished { .. } | CaptureEvent::CaptureFailed { .. } => {
                    if let Some(b) = &bar {
                        b.finish_and_clear();
                    }
                    break;
                }
                CaptureEvent::CaptureStarted { .. } => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_non_http_schemes_before_capturing() {
        let err = run("ftp://example.com", "out", 1_000, false, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[tokio::test]
    async fn rejects_bare_hostnames() {
        assert!(run("example.com", "out", 1_000, false, false)
            .await
            .is_err());
    }
}
