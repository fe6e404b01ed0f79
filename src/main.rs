pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod models;

use clap::{Parser, Subcommand};
use config::Config;
use database::Database;
use std::{net::SocketAddr, process::ExitCode, sync::Arc};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
	pub db: Arc<dyn Database>,
}

#[derive(Parser, Debug)]
#[command(version, about = "JSON CRUD service for users and their posts")]
struct Cli {
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Serve the HTTP API (the default)
	Serve(ServeArgs),
	/// Apply pending schema migrations and exit
	Migrate,
}

#[derive(Parser, Debug)]
struct ServeArgs {
	/// Address to listen on
	#[arg(long, default_value = "0.0.0.0:8080")]
	bind: SocketAddr,
}

impl Default for ServeArgs {
	fn default() -> Self {
		Self::parse_from(["serve"])
	}
}

#[derive(Debug, Error)]
enum StartupError {
	#[error("invalid configuration: {0}")]
	Config(#[from] config::ConfigError),
	#[error("could not connect to database: {0}")]
	Connect(database::Error),
	#[error("unable to run migrations: {0}")]
	Migrate(database::Error),
	#[error("unable to bind on {addr}: {source}")]
	Bind {
		addr: SocketAddr,
		source: std::io::Error,
	},
	#[error("server error: {0}")]
	Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
	_ = dotenvy::dotenv();
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("postboard=info,tower_http=info")),
		)
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	match run(cli).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			tracing::error!("{err}");
			ExitCode::FAILURE
		}
	}
}

async fn run(cli: Cli) -> Result<(), StartupError> {
	let config = Config::from_env()?;
	let db = database::connect(&config)
		.await
		.map_err(StartupError::Connect)?;

	match cli.command {
		Some(Command::Migrate) => {
			db.migrate().await.map_err(StartupError::Migrate)?;
			tracing::info!("migrations applied");
			Ok(())
		}
		Some(Command::Serve(args)) => serve(AppState { db }, args).await,
		None => serve(AppState { db }, ServeArgs::default()).await,
	}
}

async fn serve(state: AppState, args: ServeArgs) -> Result<(), StartupError> {
	let addr = args.bind;
	let router = api::route(state);
	let listener = tokio::net::TcpListener::bind(addr)
		.await
		.map_err(|source| StartupError::Bind { addr, source })?;
	tracing::info!("listening on {addr}");
	axum::serve(listener, router)
		.await
		.map_err(StartupError::Serve)
}
