//! `pagemirror deploy <dir>` — deploy an existing capture directory.

use crate::deploy::{Deployer, VercelDeployer};
use anyhow::{bail, Context, Result};
use std::path::Path;

pub async fn run(dir: &str) -> Result<()> {
    let path = Path::new(dir);
    if !path.is_dir() {
        bail!("{dir} is not a directory");
    }

    let deployer = VercelDeployer::new();
    let deployment = deployer
        .deploy(path)
        .await
        .with_context(|| format!("deployment of {dir} failed"))?;

    println!("Live at {} ({})", deployment.url, deployment.domain);
    Ok(())
}
