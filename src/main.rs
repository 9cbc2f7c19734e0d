// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use nsdy::{
    environment::Environment,
    notifier::Dns4eMirror,
    reload::ServiceReloader,
    update::DnsUpdater,
    zone_store::FsZoneStore,
};
use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

/// Regenerate NSD zone files and OpenDKIM tables for all hosted mail domains.
#[derive(Debug, Parser)]
#[command(name = "nsdy", version, about)]
struct Cli {
    /// Path of the environment file describing this server
    #[arg(long, default_value = "/etc/nsdy.yaml")]
    env_file: PathBuf,

    /// File listing mail domains one per line; reads stdin when omitted
    #[arg(long)]
    mail_domains: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("nsdy-update")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    // Initialize logging with custom format
    // Format: timestamp file:line LEVEL message
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Example: RUST_LOG=debug nsdy
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json nsdy
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    let cli = Cli::parse();
    info!("Starting DNS update run");

    debug!(env_file = %cli.env_file.display(), "loading environment");
    let env = Environment::load(&cli.env_file)?;

    let mail_domains = read_mail_domains(cli.mail_domains.as_deref())?;
    debug!(count = mail_domains.len(), "loaded mail domains");

    let mirror = env.mirror.clone().map(Dns4eMirror::new);
    let updater = DnsUpdater::new(&env, FsZoneStore, ServiceReloader, mirror);
    let summary = updater.do_update(mail_domains).await?;

    // The summary is the run's one user-facing output; empty means no change.
    print!("{summary}");
    Ok(())
}

/// Read the mail domain set from a file, or stdin when no file is given.
///
/// One domain per line; blank lines and `#` comments are ignored.
fn read_mail_domains(path: Option<&std::path::Path>) -> Result<BTreeSet<String>> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read mail domains from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read mail domains from stdin")?;
            buf
        }
    };

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect())
}
