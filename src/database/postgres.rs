use super::{Database, Error, Result};
use crate::models::*;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

pub struct PgDatabase {
	pool: PgPool,
}

impl PgDatabase {
	pub async fn connect(options: PgConnectOptions) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(32)
			.connect_with(options)
			.await?;
		Ok(Self { pool })
	}
}

fn duplicate_email(err: sqlx::Error, email: &str) -> Error {
	match &err {
		sqlx::Error::Database(db) if db.is_unique_violation() => {
			Error::DuplicateEmail(email.to_string())
		}
		_ => Error::Sqlx(err),
	}
}

#[async_trait]
impl Database for PgDatabase {
	async fn migrate(&self) -> Result<()> {
		sqlx::migrate!().run(&self.pool).await?;
		Ok(())
	}

	async fn find_users(&self) -> Result<Vec<User>> {
		let users = sqlx::query_as::<_, User>(
			"SELECT id, created_at, updated_at, deleted_at, name, email FROM users WHERE deleted_at IS NULL ORDER BY id",
		)
		.fetch_all(&self.pool)
		.await?;
		Ok(users)
	}

	async fn find_user(&self, id: i64) -> Result<User> {
		sqlx::query_as::<_, User>(
			"SELECT id, created_at, updated_at, deleted_at, name, email FROM users WHERE id = $1 AND deleted_at IS NULL",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?
		.ok_or(Error::NotFound { table: "user", id })
	}

	async fn create_user(&self, user: NewUser) -> Result<User> {
		sqlx::query_as::<_, User>(
			"INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, created_at, updated_at, deleted_at, name, email",
		)
		.bind(&user.name)
		.bind(&user.email)
		.fetch_one(&self.pool)
		.await
		.map_err(|e| duplicate_email(e, &user.email))
	}

	async fn delete_user(&self, id: i64) -> Result<User> {
		sqlx::query_as::<_, User>(
			"UPDATE users SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL RETURNING id, created_at, updated_at, deleted_at, name, email",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?
		.ok_or(Error::NotFound { table: "user", id })
	}

	async fn find_posts(&self) -> Result<Vec<Post>> {
		let posts = sqlx::query_as::<_, Post>(
			"SELECT id, created_at, updated_at, deleted_at, title, body, user_id FROM posts WHERE deleted_at IS NULL ORDER BY id",
		)
		.fetch_all(&self.pool)
		.await?;
		Ok(posts)
	}

	async fn find_user_posts(&self, user_id: i64) -> Result<Vec<Post>> {
		let posts = sqlx::query_as::<_, Post>(
			"SELECT id, created_at, updated_at, deleted_at, title, body, user_id FROM posts WHERE user_id = $1 AND deleted_at IS NULL ORDER BY id",
		)
		.bind(user_id)
		.fetch_all(&self.pool)
		.await?;
		Ok(posts)
	}

	async fn find_post(&self, id: i64) -> Result<Post> {
		sqlx::query_as::<_, Post>(
			"SELECT id, created_at, updated_at, deleted_at, title, body, user_id FROM posts WHERE id = $1 AND deleted_at IS NULL",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?
		.ok_or(Error::NotFound { table: "post", id })
	}

	async fn create_post(&self, post: NewPost) -> Result<Post> {
		let post = sqlx::query_as::<_, Post>(
			"INSERT INTO posts (title, body, user_id) VALUES ($1, $2, $3) RETURNING id, created_at, updated_at, deleted_at, title, body, user_id",
		)
		.bind(&post.title)
		.bind(&post.body)
		.bind(post.user_id)
		.fetch_one(&self.pool)
		.await?;
		Ok(post)
	}

	async fn delete_post(&self, id: i64) -> Result<Post> {
		sqlx::query_as::<_, Post>(
			"UPDATE posts SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL RETURNING id, created_at, updated_at, deleted_at, title, body, user_id",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?
		.ok_or(Error::NotFound { table: "post", id })
	}
}
