//! Error types for the capture pipeline.
//!
//! Two tiers mirror the pipeline's failure semantics: [`RenderError`] and
//! [`CaptureError`] are fatal to a run and are converted to a failed
//! `CaptureResult` at the engine boundary, while [`FetchError`] and
//! [`AssetError`] cover single assets and are logged and skipped.

use thiserror::Error;

/// Errors raised while rendering a page in the headless browser.
///
/// Any of these is fatal to the capture that triggered it: there is no
/// partial document without a successful render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation timed out after {timeout_ms}ms for {url}")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("failed to serialize rendered DOM: {0}")]
    Serialize(String),
}

/// Fatal capture errors. The engine catches these at its boundary and
/// returns a `success: false` result with zero counters.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to prepare output directory {path}: {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write root document {path}: {source}")]
    RootWrite {
        path: String,
        source: std::io::Error,
    },
}

/// A single asset request failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Why a single asset is absent from the output. Fetch failures and disk
/// write failures receive identical treatment: the asset is skipped and the
/// loop continues.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Deployment failures. These never affect the capture result.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to run the vercel CLI: {0}")]
    Spawn(std::io::Error),

    #[error("deployment timed out after {0}s")]
    Timeout(u64),

    #[error("vercel CLI failed: {0}")]
    Command(String),

    #[error("could not find a deployment URL in the vercel output")]
    MissingUrl,
}
