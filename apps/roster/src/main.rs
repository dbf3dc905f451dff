use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{ActionOutcome, RosterApp};
use shared::domain::ActivitySnapshot;
use tracing::info;

mod config;

use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides `server_url` from the config file and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the current roster.
    Show,
    Signup {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    Unregister {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    /// Re-renders the roster periodically until interrupted.
    Watch {
        #[arg(long)]
        every_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config);
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let app = RosterApp::connect(&settings.server_url, settings.timings())?;
    info!(server_url = %settings.server_url, "roster client ready");

    match cli.command {
        Command::Show => {
            let loaded = app.load().await;
            print!("{}", app.roster_outline());
            print_summary(&loaded?);
        }
        Command::Signup { activity, email } => signup(&app, &activity, &email).await?,
        Command::Unregister { activity, email } => unregister(&app, &activity, &email).await?,
        Command::Watch { every_secs } => {
            let every = every_secs
                .map(Duration::from_secs)
                .or_else(|| settings.refresh_interval())
                .unwrap_or(Duration::ZERO);
            watch(&app, every).await?;
        }
    }

    Ok(())
}

/// The activity selector only offers what the server last reported, so a
/// failed load is reported as is rather than as a missing selection.
async fn signup(app: &RosterApp, activity: &str, email: &str) -> Result<()> {
    app.load().await?;
    let outcome = app.signup(activity, email).await;
    report(app, outcome)
}

async fn unregister(app: &RosterApp, activity: &str, email: &str) -> Result<()> {
    app.load().await?;
    let outcome = app.unregister(activity, email).await;
    if matches!(outcome, ActionOutcome::Ignored) {
        bail!("{email} is not listed under {activity}");
    }
    report(app, outcome)
}

fn report(app: &RosterApp, outcome: ActionOutcome) -> Result<()> {
    let message = app.message().unwrap_or_default();
    print!("{}", app.roster_outline());
    match outcome {
        ActionOutcome::Succeeded { .. } => {
            println!("{message}");
            Ok(())
        }
        ActionOutcome::Failed(err) => bail!("{message} ({err})"),
        ActionOutcome::Ignored => bail!("action ignored: control is busy"),
    }
}

fn print_summary(snapshot: &ActivitySnapshot) {
    for (name, details) in snapshot {
        println!(
            "{name}: {}/{} participants",
            details.participants.len(),
            details.max_participants
        );
    }
}

async fn watch(app: &RosterApp, every: Duration) -> Result<()> {
    let Some(refresher) = app.spawn_background_refresh(every) else {
        bail!("background refresh is disabled; pass --every-secs or set refresh_interval_secs");
    };
    let _ = app.load().await;
    print!("{}", app.roster_outline());

    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                println!("---");
                print!("{}", app.roster_outline());
            }
            signal = tokio::signal::ctrl_c() => {
                refresher.abort();
                signal?;
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
