//! Environment readiness check.

use crate::renderer::chromium::find_chromium;
use anyhow::Result;

/// Check Chromium and vercel CLI availability.
pub async fn run() -> Result<()> {
    println!("Pagemirror Doctor");
    println!("=================");
    println!();

    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    let chromium = find_chromium();
    match &chromium {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Install Chrome or set PAGEMIRROR_CHROMIUM_PATH."
        ),
    }

    let npx = which::which("npx").ok();
    match &npx {
        Some(path) => println!("[OK] npx found: {} (deploy step available)", path.display()),
        None => println!("[!!] npx NOT found. The deploy step needs Node.js and the vercel CLI."),
    }

    println!();
    if chromium.is_some() {
        println!("Status: READY");
        if npx.is_none() {
            println!("  Capture works; deployment will fail until npx is installed.");
        }
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}
