//! Session-aware asset fetching.
//!
//! Assets are retrieved through a cookie jar seeded with the cookies the
//! browser session accumulated during the render, so resources behind
//! cookie-gated CDNs resolve the same way they did for the page itself. The
//! jar is live for the whole fetch loop: a `Set-Cookie` on one asset
//! response applies to the requests after it, as it would inside the
//! browser's own network context.

use crate::error::FetchError;
use crate::renderer::SessionCookie;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// One successfully fetched asset body.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub url: String,
    pub body: Vec<u8>,
}

/// Retrieves a single asset by URL.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// GET `url` and return the full body. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError>;
}

/// reqwest-backed fetcher sharing one cookie jar across the asset loop.
pub struct SessionClient {
    client: reqwest::Client,
}

impl SessionClient {
    pub fn new(cookies: Vec<SessionCookie>, timeout_ms: u64) -> Self {
        let jar = seed_jar(&cookies);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .cookie_provider(jar)
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

/// Build a cookie jar holding the browser session's cookies. Cookies scoped
/// to a domain (with or without the leading dot) cover its subdomains;
/// responses seen during the fetch loop update the same jar.
fn seed_jar(cookies: &[SessionCookie]) -> Arc<Jar> {
    let jar = Arc::new(Jar::default());
    for cookie in cookies {
        let domain = cookie.domain.trim_start_matches('.');
        let Ok(url) = Url::parse(&format!("https://{domain}/")) else {
            continue;
        };
        jar.add_cookie_str(
            &format!("{}={}; Domain={domain}; Path=/", cookie.name, cookie.value),
            &url,
        );
    }
    jar
}

#[async_trait]
impl AssetFetcher for SessionClient {
    async fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?.to_vec();
        Ok(FetchedAsset {
            url: url.to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;

    fn cookie(name: &str, value: &str, domain: &str) -> SessionCookie {
        SessionCookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.to_string(),
        }
    }

    #[test]
    fn seeded_cookies_apply_to_their_domain() {
        let jar = seed_jar(&[
            cookie("session", "abc", "example.com"),
            cookie("theme", "dark", ".example.com"),
            cookie("other", "x", "unrelated.com"),
        ]);
        let url = Url::parse("https://example.com/app.css").unwrap();
        let header = jar.cookies(&url).unwrap();
        let header = header.to_str().unwrap();
        assert!(header.contains("session=abc"));
        assert!(header.contains("theme=dark"));
        assert!(!header.contains("other=x"));
    }

    #[test]
    fn domain_cookies_cover_subdomains() {
        let jar = seed_jar(&[cookie("session", "abc", "example.com")]);
        let url = Url::parse("https://cdn.example.com/app.css").unwrap();
        assert!(jar.cookies(&url).is_some());
    }

    #[test]
    fn no_cookies_for_unrelated_hosts() {
        let jar = seed_jar(&[cookie("session", "abc", "example.com")]);
        let url = Url::parse("https://other.com/app.css").unwrap();
        assert!(jar.cookies(&url).is_none());
    }
}
