use super::{Database, Error, Result};
use crate::models::*;
use async_trait::async_trait;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;

/// Process-local store with the same soft-delete and uniqueness rules as the
/// postgres tables. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryDatabase {
	tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
	users: BTreeMap<i64, User>,
	posts: BTreeMap<i64, Post>,
	last_user_id: i64,
	last_post_id: i64,
}

#[async_trait]
impl Database for MemoryDatabase {
	async fn migrate(&self) -> Result<()> {
		tracing::info!("in-memory store has no schema to migrate");
		Ok(())
	}

	async fn find_users(&self) -> Result<Vec<User>> {
		let tables = self.tables.read().await;
		Ok(tables
			.users
			.values()
			.filter(|user| !user.is_deleted())
			.cloned()
			.collect())
	}

	async fn find_user(&self, id: i64) -> Result<User> {
		let tables = self.tables.read().await;
		tables
			.users
			.get(&id)
			.filter(|user| !user.is_deleted())
			.cloned()
			.ok_or(Error::NotFound { table: "user", id })
	}

	async fn create_user(&self, user: NewUser) -> Result<User> {
		let mut tables = self.tables.write().await;
		// Unique across soft-deleted rows too, matching the table index.
		if tables.users.values().any(|u| u.email == user.email) {
			return Err(Error::DuplicateEmail(user.email));
		}

		tables.last_user_id += 1;
		let now = OffsetDateTime::now_utc();
		let user = User {
			id: tables.last_user_id,
			created_at: now,
			updated_at: now,
			deleted_at: None,
			name: user.name,
			email: user.email,
			posts: Vec::new(),
		};
		tables.users.insert(user.id, user.clone());
		Ok(user)
	}

	async fn delete_user(&self, id: i64) -> Result<User> {
		let mut tables = self.tables.write().await;
		let Some(user) = tables.users.get_mut(&id).filter(|user| !user.is_deleted()) else {
			return Err(Error::NotFound { table: "user", id });
		};
		let now = OffsetDateTime::now_utc();
		user.deleted_at = Some(now);
		user.updated_at = now;
		Ok(user.clone())
	}

	async fn find_posts(&self) -> Result<Vec<Post>> {
		let tables = self.tables.read().await;
		Ok(tables
			.posts
			.values()
			.filter(|post| !post.is_deleted())
			.cloned()
			.collect())
	}

	async fn find_user_posts(&self, user_id: i64) -> Result<Vec<Post>> {
		let tables = self.tables.read().await;
		Ok(tables
			.posts
			.values()
			.filter(|post| post.user_id == user_id && !post.is_deleted())
			.cloned()
			.collect())
	}

	async fn find_post(&self, id: i64) -> Result<Post> {
		let tables = self.tables.read().await;
		tables
			.posts
			.get(&id)
			.filter(|post| !post.is_deleted())
			.cloned()
			.ok_or(Error::NotFound { table: "post", id })
	}

	async fn create_post(&self, post: NewPost) -> Result<Post> {
		let mut tables = self.tables.write().await;
		tables.last_post_id += 1;
		let now = OffsetDateTime::now_utc();
		let post = Post {
			id: tables.last_post_id,
			created_at: now,
			updated_at: now,
			deleted_at: None,
			title: post.title,
			body: post.body,
			user_id: post.user_id,
		};
		tables.posts.insert(post.id, post.clone());
		Ok(post)
	}

	async fn delete_post(&self, id: i64) -> Result<Post> {
		let mut tables = self.tables.write().await;
		let Some(post) = tables.posts.get_mut(&id).filter(|post| !post.is_deleted()) else {
			return Err(Error::NotFound { table: "post", id });
		};
		let now = OffsetDateTime::now_utc();
		post.deleted_at = Some(now);
		post.updated_at = now;
		Ok(post.clone())
	}
}

#[cfg(test)]
impl MemoryDatabase {
	/// Raw row lookup that ignores the soft-delete marker.
	pub async fn stored_user(&self, id: i64) -> Option<User> {
		self.tables.read().await.users.get(&id).cloned()
	}

	pub async fn stored_post(&self, id: i64) -> Option<Post> {
		self.tables.read().await.posts.get(&id).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;
	use std::sync::Arc;

	fn new_user(name: &str) -> NewUser {
		NewUser {
			name: name.to_string(),
			email: format!("{name}@example.com"),
		}
	}

	#[tokio::test]
	async fn ids_are_assigned_in_order() {
		let db = MemoryDatabase::default();
		let first = db.create_user(new_user("a")).await.unwrap();
		let second = db.create_user(new_user("b")).await.unwrap();
		assert_eq!(first.id, 1);
		assert_eq!(second.id, 2);
	}

	#[tokio::test]
	async fn deleted_ids_are_not_reused() {
		let db = MemoryDatabase::default();
		let post = db.create_post(NewPost::default()).await.unwrap();
		db.delete_post(post.id).await.unwrap();

		let next = db.create_post(NewPost::default()).await.unwrap();
		assert_ne!(next.id, post.id);
	}

	#[tokio::test]
	async fn soft_delete_keeps_the_row() {
		let db = MemoryDatabase::default();
		let user = db.create_user(new_user("ada")).await.unwrap();

		let deleted = db.delete_user(user.id).await.unwrap();
		assert!(deleted.is_deleted());
		assert!(db.find_users().await.unwrap().is_empty());
		assert!(matches!(
			db.find_user(user.id).await,
			Err(Error::NotFound { table: "user", .. })
		));

		assert_eq!(deleted.deleted_at, Some(deleted.updated_at));
		assert!(deleted.updated_at >= user.updated_at);

		let stored = db.stored_user(user.id).await.unwrap();
		assert_eq!(stored.deleted_at, deleted.deleted_at);
		assert_eq!(stored.updated_at, deleted.updated_at);
	}

	#[tokio::test]
	async fn deleting_twice_is_not_found() {
		let db = MemoryDatabase::default();
		let post = db.create_post(NewPost::default()).await.unwrap();
		db.delete_post(post.id).await.unwrap();

		assert!(matches!(
			db.delete_post(post.id).await,
			Err(Error::NotFound { table: "post", .. })
		));
		assert!(db.stored_post(post.id).await.unwrap().is_deleted());
	}

	#[tokio::test]
	async fn email_stays_taken_after_soft_delete() {
		let db = MemoryDatabase::default();
		let user = db.create_user(new_user("ada")).await.unwrap();
		db.delete_user(user.id).await.unwrap();

		assert!(matches!(
			db.create_user(new_user("ada")).await,
			Err(Error::DuplicateEmail(_))
		));
	}

	#[tokio::test]
	async fn concurrent_creates_get_distinct_ids() {
		let db = Arc::new(MemoryDatabase::default());
		let mut tasks = Vec::new();
		for i in 0..64 {
			let db = db.clone();
			tasks.push(tokio::spawn(async move {
				db.create_post(NewPost {
					title: format!("post {i}"),
					..Default::default()
				})
				.await
				.unwrap()
				.id
			}));
		}

		let mut ids = HashSet::new();
		for task in tasks {
			assert!(ids.insert(task.await.unwrap()));
		}
		assert_eq!(ids.len(), 64);
	}
}
