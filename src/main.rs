// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Calendar-Sync job runner
//!
//! Invoked by a scheduler (cron, systemd timer, Cloud Scheduler job). Each
//! invocation runs a single pass and exits; a non-zero exit status signals
//! a failed pass.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use strava_calendar_sync::{
    config::{parse_since, Config},
    db::{JsonFileStore, StateStore},
    error::AppError,
    services::{
        activity::build_event, GoogleCalendarClient, StravaClient, SyncEngine, SyncOptions,
        TokenManager,
    },
    time_utils::{format_unix_rfc3339, format_utc_rfc3339},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "strava-calendar-sync")]
#[command(about = "Mirror new Strava activities as calendar events")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Sync activities newer than the stored cursor (default)
    Sync,
    /// Re-sync all activities started after a point in time
    Recover {
        /// Unix seconds or RFC3339 timestamp
        #[arg(long)]
        since: String,
    },
    /// Show the event a single activity maps to, without creating it
    Show {
        activity_id: u64,
    },
    /// Reset the sync cursor (0 re-syncs everything)
    ResetCursor {
        #[arg(long, default_value_t = 0)]
        to: u64,
    },
    /// Print the stored cursor and token expiry
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli.command.unwrap_or(Command::Sync)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, fatal = e.is_fatal(), "Sync pass failed");
            if e.is_strava_token_error() {
                tracing::warn!(
                    "Strava rejected the access token; check STRAVA_CLIENT_ID, \
                     STRAVA_CLIENT_SECRET and STRAVA_REFRESH_TOKEN"
                );
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    // Load configuration first: no network call without all secrets.
    let config = Config::from_env()?;
    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(&config.state_path));
    let strava = StravaClient::from_config(&config);
    let tokens = TokenManager::new(
        strava.clone(),
        store.clone(),
        config.strava_refresh_token.clone(),
    );

    match command {
        Command::Sync => {
            let engine = build_engine(&config, strava, store)?;
            let access_token = tokens.ensure_valid_access_token().await?;
            let created = engine.sync_new_activities(&access_token).await?;
            tracing::info!(created, "Sync pass finished");
        }
        Command::Recover { since } => {
            let since = parse_since(&since)?;
            let engine = build_engine(&config, strava, store)?;
            let access_token = tokens.ensure_valid_access_token().await?;
            let created = engine.recover_window(&access_token, since).await?;
            tracing::info!(created, since, "Recovery pass finished");
        }
        Command::Show { activity_id } => {
            let access_token = tokens.ensure_valid_access_token().await?;
            let activity = strava.get_activity(&access_token, activity_id).await?;
            let event = build_event(&activity)
                .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
            println!("Title:    {}", event.title);
            println!("Start:    {}", format_utc_rfc3339(event.start));
            println!("End:      {}", format_utc_rfc3339(event.end));
            println!("Location: {}", event.location);
            println!();
            println!("{}", event.body);
        }
        Command::ResetCursor { to } => {
            let previous = store.cursor()?;
            store.set_cursor(to)?;
            tracing::info!(previous, cursor = to, "Cursor reset");
        }
        Command::Status => {
            let credentials = store.load_credentials()?;
            println!("Cursor:        {}", store.cursor()?);
            println!(
                "Token expires: {}",
                format_unix_rfc3339(credentials.expires_at)
                    .filter(|_| !credentials.access_token.is_empty())
                    .unwrap_or_else(|| "never refreshed".to_string())
            );
        }
    }

    Ok(())
}

fn build_engine(
    config: &Config,
    strava: StravaClient,
    store: Arc<dyn StateStore>,
) -> Result<SyncEngine, AppError> {
    let calendar = Arc::new(GoogleCalendarClient::from_config(config)?);
    Ok(SyncEngine::new(
        strava,
        calendar,
        store,
        SyncOptions::from_config(config),
    ))
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("strava_calendar_sync=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
