mod memory;
mod postgres;

pub use memory::MemoryDatabase;
pub use postgres::PgDatabase;

use crate::config::{Config, Dialect};
use crate::models::*;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("{table} {id} not found")]
	NotFound { table: &'static str, id: i64 },
	#[error("email {0:?} is already registered")]
	DuplicateEmail(String),
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error(transparent)]
	Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Storage for users and posts.
///
/// Every lookup skips soft-deleted rows. Deleting only sets `deleted_at`, the
/// row itself is kept.
#[async_trait]
pub trait Database: Send + Sync {
	/// Brings the schema up to date. Run by the `migrate` subcommand only.
	async fn migrate(&self) -> Result<()>;

	async fn find_users(&self) -> Result<Vec<User>>;
	async fn find_user(&self, id: i64) -> Result<User>;
	async fn create_user(&self, user: NewUser) -> Result<User>;
	async fn delete_user(&self, id: i64) -> Result<User>;

	async fn find_posts(&self) -> Result<Vec<Post>>;
	async fn find_user_posts(&self, user_id: i64) -> Result<Vec<Post>>;
	async fn find_post(&self, id: i64) -> Result<Post>;
	async fn create_post(&self, post: NewPost) -> Result<Post>;
	async fn delete_post(&self, id: i64) -> Result<Post>;
}

pub async fn connect(config: &Config) -> Result<Arc<dyn Database>> {
	match config.dialect {
		Dialect::Postgres => {
			tracing::info!(
				host = %config.host,
				port = config.port,
				database = %config.name,
				"connecting to postgres"
			);
			let db = PgDatabase::connect(config.pg_options()).await?;
			tracing::info!("connected to database successfully");
			Ok(Arc::new(db))
		}
		Dialect::Memory => {
			tracing::warn!("using the in-memory store, nothing will be persisted");
			Ok(Arc::new(MemoryDatabase::default()))
		}
	}
}
