//! Vercel deployment step.
//!
//! Shells out to the `vercel` CLI and parses the live URL out of its stdout.
//! The text-scraping is confined behind the [`Deployer`] trait so it can be
//! swapped for a proper API client without touching the capture engine.

use crate::error::DeployError;
use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

/// External process timeout for the vercel CLI.
const DEPLOY_TIMEOUT_SECS: u64 = 180;

/// Pattern the live URL is expected to match in the CLI output.
const URL_PATTERN: &str = r"https://[^\s]+\.vercel\.app";

/// A successful deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub url: String,
    pub domain: String,
}

/// Uploads a capture directory to a hosting provider.
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(&self, path: &Path) -> Result<Deployment, DeployError>;
}

/// Deploys a directory with `npx vercel --prod`.
pub struct VercelDeployer {
    timeout_secs: u64,
}

impl VercelDeployer {
    pub fn new() -> Self {
        Self {
            timeout_secs: DEPLOY_TIMEOUT_SECS,
        }
    }
}

impl Default for VercelDeployer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Deployer for VercelDeployer {
    async fn deploy(&self, path: &Path) -> Result<Deployment, DeployError> {
        let name = project_name();
        info!("deploying {} as project {name}", path.display());

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new("npx")
                .args(["vercel", "--prod", "--yes", "--name", &name])
                .arg(path)
                .output(),
        )
        .await
        .map_err(|_| DeployError::Timeout(self.timeout_secs))?
        .map_err(DeployError::Spawn)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() || stderr.contains("Error") {
            return Err(DeployError::Command(stderr.trim().to_string()));
        }

        let url = parse_deploy_url(&stdout).ok_or(DeployError::MissingUrl)?;
        let domain = url.trim_start_matches("https://").to_string();
        info!("deployment live at {url}");

        Ok(Deployment { url, domain })
    }
}

/// Extract the first deployment URL from the vercel CLI output.
fn parse_deploy_url(output: &str) -> Option<String> {
    let re = Regex::new(URL_PATTERN).ok()?;
    re.find(output).map(|m| m.as_str().to_string())
}

/// Generate a unique project name: `cloned-<timestamp base36>-<random>`.
fn project_name() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("cloned-{}-{suffix}", to_base36(millis))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_first_deployment_url() {
        let output = "Inspect: https://vercel.com/acct/x/abc\n\
                      Production: https://cloned-abc-123.vercel.app [1s]\n\
                      https://cloned-abc-123-alias.vercel.app\n";
        assert_eq!(
            parse_deploy_url(output).as_deref(),
            Some("https://cloned-abc-123.vercel.app")
        );
    }

    #[test]
    fn no_url_yields_none() {
        assert!(parse_deploy_url("Deployment queued...").is_none());
        assert!(parse_deploy_url("").is_none());
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36), "100");
    }

    #[test]
    fn project_names_have_the_expected_shape() {
        let name = project_name();
        assert!(name.starts_with("cloned-"));
        assert_eq!(name.split('-').count(), 3);
        let suffix = name.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 6);
    }
}
