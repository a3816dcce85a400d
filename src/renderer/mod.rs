//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the [`Renderer`] trait that abstracts over the browser engine
//! (currently Chromium via chromiumoxide). A renderer takes a URL to a
//! quiescent network state and yields the serialized DOM, the asset
//! references discovered in it, and the session cookies the browser
//! accumulated on the way.

pub mod assets;
pub mod chromium;

use crate::error::RenderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A fully rendered page: the serialized DOM plus everything the fetch step
/// needs to retrieve its assets under the same session.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Serialized DOM after the page reached network quiescence.
    pub html: String,
    /// URL the browser ended up on after redirects.
    pub final_url: String,
    /// Asset URLs in discovery order: stylesheets, then scripts, then
    /// images. Duplicates are preserved; each occurrence is fetched.
    pub asset_urls: Vec<String>,
    /// Cookies from the browser session, reused for asset fetches.
    pub cookies: Vec<SessionCookie>,
}

/// A cookie captured from the browser session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

/// A browser engine that renders a single page to quiescence.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `url` and return the settled DOM with its asset references.
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError>;
}
