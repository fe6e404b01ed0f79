use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("unsupported DIALECT {0:?}, expected \"postgres\" or \"memory\"")]
	UnsupportedDialect(String),
	#[error("DBPORT must be a port number, got {0:?}")]
	InvalidPort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
	Postgres,
	Memory,
}

impl FromStr for Dialect {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"" | "postgres" | "postgresql" => Ok(Self::Postgres),
			"memory" => Ok(Self::Memory),
			_ => Err(ConfigError::UnsupportedDialect(s.to_string())),
		}
	}
}

#[derive(Clone)]
pub struct Config {
	pub dialect: Dialect,
	pub host: String,
	pub port: u16,
	pub user: String,
	pub name: String,
	pub password: String,
}

impl std::fmt::Debug for Config {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Config")
			.field("dialect", &self.dialect)
			.field("host", &self.host)
			.field("port", &self.port)
			.field("user", &self.user)
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}

impl Config {
	/// Reads `DIALECT`, `HOST`, `DBPORT`, `USER`, `NAME` and `PASSWORD`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let var = |key: &str| lookup(key).unwrap_or_default();

		let dialect = var("DIALECT").parse()?;
		let port = match lookup("DBPORT").filter(|port| !port.trim().is_empty()) {
			Some(port) => port
				.trim()
				.parse::<u16>()
				.map_err(|_| ConfigError::InvalidPort(port))?,
			None => 5432,
		};
		let host = lookup("HOST")
			.filter(|host| !host.is_empty())
			.unwrap_or_else(|| String::from("localhost"));

		Ok(Self {
			dialect,
			host,
			port,
			user: var("USER"),
			name: var("NAME"),
			password: var("PASSWORD"),
		})
	}

	/// Empty values fall through to libpq-style defaults (`PGUSER` and friends).
	pub fn pg_options(&self) -> PgConnectOptions {
		let mut options = PgConnectOptions::new()
			.host(&self.host)
			.port(self.port)
			.ssl_mode(PgSslMode::Disable);
		if !self.user.is_empty() {
			options = options.username(&self.user);
		}
		if !self.name.is_empty() {
			options = options.database(&self.name);
		}
		if !self.password.is_empty() {
			options = options.password(&self.password);
		}
		options
	}
}
