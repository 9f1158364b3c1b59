//! Issuetrack API server binary.
//!
//! Reads configuration from the environment (and `.env`), lets command-line
//! flags override it, then serves the REST API until Ctrl-C.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use issuetrack_api::config::{ApiConfig, parse_minutes};
use issuetrack_core::auth::StaticUserDirectory;
use issuetrack_core::auth::password::hash_password;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "issuetrack_api_server", about = "Issuetrack API server", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a bcrypt hash for a users file entry.
    ///
    /// Reads the password from stdin when it is not given as an argument.
    HashPassword { password: Option<String> },
}

/// Flags overriding the environment. `JWT_SECRET` is only read from the
/// environment.
#[derive(Args, Debug)]
struct ServeArgs {
    /// Listen address (overrides `BIND_ADDR`).
    #[arg(long)]
    bind_addr: Option<String>,

    /// Issues JSON file (overrides `ISSUES_FILE`).
    #[arg(long)]
    issues_file: Option<PathBuf>,

    /// Users JSON file (overrides `USERS_FILE`).
    #[arg(long)]
    users_file: Option<PathBuf>,

    /// Access token lifetime in minutes (overrides `ACCESS_TOKEN_EXPIRE_MINUTES`).
    #[arg(long, value_parser = |raw: &str| parse_minutes("--token-ttl-minutes", raw))]
    token_ttl_minutes: Option<i64>,
}

impl ServeArgs {
    fn apply(self, config: &mut ApiConfig) {
        if let Some(bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr;
        }
        if let Some(issues_file) = self.issues_file {
            config.issues_file = issues_file;
        }
        if let Some(users_file) = self.users_file {
            config.users_file = Some(users_file);
        }
        if let Some(minutes) = self.token_ttl_minutes {
            config.token_ttl_minutes = minutes;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,issuetrack_api=debug,issuetrack_core=debug")
            }),
        )
        .init();

    let cli = Cli::parse();

    if let Some(Command::HashPassword { password }) = cli.command {
        let password = match password {
            Some(p) => p,
            None => read_password_line()?,
        };
        println!("{}", hash_password(&password)?);
        return Ok(());
    }

    let mut config = ApiConfig::from_env()?;
    cli.serve.apply(&mut config);
    info!(?config, "starting issuetrack_api_server");

    let directory = match &config.users_file {
        Some(path) => StaticUserDirectory::load(path)?,
        None => {
            warn!("no users file configured; every login will be refused");
            StaticUserDirectory::default()
        }
    };

    let state = issuetrack_api::AppState::new(&config, Arc::new(directory))?;
    let app = issuetrack_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, issues_file = %config.issues_file.display(), "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

fn read_password_line() -> std::io::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, shutting down");
}
