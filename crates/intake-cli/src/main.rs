//! `intake`: admin command line for the record intake service.
//!
//! # Usage
//!
//! ```text
//! intake --url http://localhost:3001 dashboard --granularity month --date 2025-01
//! intake --config ~/.config/intake/config.toml report
//! intake status p-1736050000 approved
//! intake export backup.json
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, Period};
use intake_core::{profile::ProfileStatus, window::Granularity};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "intake", about = "Admin tool for the record intake service")]
struct Args {
  /// Path to a TOML config file (url, timeout_secs).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the intake server (default: http://localhost:3001).
  #[arg(long, env = "INTAKE_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(clap::Args, Debug, Clone)]
struct PeriodArgs {
  /// day, month or year.
  #[arg(short, long, default_value = "day")]
  granularity: Granularity,

  /// Anchor date (YYYY-MM-DD or YYYY-MM). The current period when omitted.
  #[arg(short, long)]
  date: Option<String>,
}

impl From<PeriodArgs> for Period {
  fn from(args: PeriodArgs) -> Self {
    Period { granularity: args.granularity, date: args.date }
  }
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every stored profile, newest first.
  List,
  /// Show the collaborator ranking and chart for a period.
  Dashboard(PeriodArgs),
  /// Send the period report to the admin channel.
  Report(PeriodArgs),
  /// Set a profile's review status (pending, approved, rejected).
  Status { id: String, status: ProfileStatus },
  /// Delete a profile and its photos.
  Delete { id: String },
  /// Delete one photo from a profile.
  DeletePhoto { profile: String, photo: String },
  /// Delete every profile and photo.
  Clear,
  /// Write a JSON backup of every profile to FILE.
  Export {
    file:   PathBuf,
    #[command(flatten)]
    period: PeriodArgs,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:          String,
  timeout_secs: Option<u64>,
}

const DEFAULT_URL: &str = "http://localhost:3001";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI flags override the config file, which overrides defaults.
fn resolve_config(url: Option<String>, file_cfg: ConfigFile) -> ApiConfig {
  ApiConfig {
    base_url:     url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    timeout_secs: file_cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let api_config = resolve_config(args.url, file_cfg);
  tracing::debug!(url = %api_config.base_url, "using server");
  let client = ApiClient::new(api_config)?;

  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  let tz = Local;
  match command {
    Command::List => {
      let profiles = client.list_profiles().await?;
      if profiles.is_empty() {
        println!("No profiles stored.");
      } else {
        print!("{}", render::profile_table(&profiles, &tz));
      }
    }
    Command::Dashboard(period) => {
      let view = client.dashboard(&period.into()).await?;
      print!("{}", render::dashboard(&view, &tz));
    }
    Command::Report(period) => {
      let outcome = client.report(&period.into()).await?;
      println!("{}", outcome.message());
      if !outcome.is_sent() {
        std::process::exit(1);
      }
    }
    Command::Status { id, status } => {
      client.set_status(&id, status).await?;
      println!("{id}: {status}");
    }
    Command::Delete { id } => {
      client.delete_profile(&id).await?;
      println!("Deleted profile {id}");
    }
    Command::DeletePhoto { profile, photo } => {
      client.delete_photo(&profile, &photo).await?;
      println!("Deleted photo {photo} from {profile}");
    }
    Command::Clear => {
      client.clear().await?;
      println!("All profiles deleted");
    }
    Command::Export { file, period } => {
      let bytes = client.export(&period.into()).await?;
      std::fs::write(&file, &bytes)
        .with_context(|| format!("writing {}", file.display()))?;
      println!("Wrote {} bytes to {}", bytes.len(), file.display());
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flag_beats_file_beats_default() {
    let file = || ConfigFile { url: "http://file:1".into(), timeout_secs: Some(5) };

    let cfg = resolve_config(Some("http://flag:2".into()), file());
    assert_eq!(cfg.base_url, "http://flag:2");
    assert_eq!(cfg.timeout_secs, 5);

    assert_eq!(resolve_config(None, file()).base_url, "http://file:1");

    let cfg = resolve_config(None, ConfigFile::default());
    assert_eq!(cfg.base_url, DEFAULT_URL);
    assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
  }

  #[test]
  fn subcommands_parse() {
    let args = Args::try_parse_from([
      "intake", "--url", "http://x", "dashboard", "--granularity", "month", "--date", "2025-01",
    ])
    .unwrap();
    match args.command {
      Command::Dashboard(p) => {
        assert_eq!(p.granularity, Granularity::Month);
        assert_eq!(p.date.as_deref(), Some("2025-01"));
      }
      other => panic!("unexpected {other:?}"),
    }

    let args = Args::try_parse_from(["intake", "status", "p1", "approved"]).unwrap();
    assert!(matches!(
      args.command,
      Command::Status { status: ProfileStatus::Approved, .. }
    ));

    assert!(Args::try_parse_from(["intake", "status", "p1", "archived"]).is_err());
  }
}
