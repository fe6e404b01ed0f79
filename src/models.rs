use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// Field names on the wire are the ones existing clients were built against,
// hence the PascalCase with upper-case ID suffixes.

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct User {
	#[serde(rename = "ID")]
	pub id: i64,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339::option")]
	pub deleted_at: Option<OffsetDateTime>,
	pub name: String,
	pub email: String,
	#[sqlx(skip)]
	pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
	#[serde(rename = "ID")]
	pub id: i64,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339::option")]
	pub deleted_at: Option<OffsetDateTime>,
	pub title: String,
	pub body: String,
	#[serde(rename = "UserID")]
	pub user_id: i64,
}

/// Body of `POST /create/user`. Missing fields decode to empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
	#[serde(alias = "Name")]
	pub name: String,
	#[serde(alias = "Email")]
	pub email: String,
}

/// Body of `POST /create/post`. The owner is stored as given, it is never
/// checked against the users table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewPost {
	#[serde(alias = "Title")]
	pub title: String,
	#[serde(alias = "Body")]
	pub body: String,
	#[serde(alias = "UserID", alias = "UserId", alias = "userId")]
	pub user_id: i64,
}

impl User {
	pub fn is_deleted(&self) -> bool {
		self.deleted_at.is_some()
	}
}

impl Post {
	pub fn is_deleted(&self) -> bool {
		self.deleted_at.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn user_serializes_with_legacy_field_names() {
		let user = User {
			id: 7,
			created_at: OffsetDateTime::UNIX_EPOCH,
			updated_at: OffsetDateTime::UNIX_EPOCH,
			deleted_at: None,
			name: String::from("Ada"),
			email: String::from("ada@example.com"),
			posts: Vec::new(),
		};

		let value = serde_json::to_value(&user).unwrap();
		assert_eq!(value["ID"], json!(7));
		assert_eq!(value["Name"], json!("Ada"));
		assert_eq!(value["Email"], json!("ada@example.com"));
		assert_eq!(value["CreatedAt"], json!("1970-01-01T00:00:00Z"));
		assert_eq!(value["DeletedAt"], json!(null));
		assert_eq!(value["Posts"], json!([]));
	}

	#[test]
	fn post_serializes_owner_as_user_id() {
		let post = Post {
			id: 3,
			created_at: OffsetDateTime::UNIX_EPOCH,
			updated_at: OffsetDateTime::UNIX_EPOCH,
			deleted_at: Some(OffsetDateTime::UNIX_EPOCH),
			title: String::from("t"),
			body: String::from("b"),
			user_id: 9,
		};

		let value = serde_json::to_value(&post).unwrap();
		assert_eq!(value["UserID"], json!(9));
		assert_eq!(value["DeletedAt"], json!("1970-01-01T00:00:00Z"));
		assert!(post.is_deleted());
	}

	#[test]
	fn new_post_accepts_either_casing() {
		let legacy: NewPost =
			serde_json::from_value(json!({"Title": "T", "Body": "B", "UserID": 4})).unwrap();
		let snake: NewPost =
			serde_json::from_value(json!({"title": "T", "body": "B", "user_id": 4})).unwrap();

		assert_eq!(legacy.title, snake.title);
		assert_eq!(legacy.body, snake.body);
		assert_eq!(legacy.user_id, 4);
		assert_eq!(snake.user_id, 4);
	}

	#[test]
	fn missing_fields_decode_to_zero_values() {
		let user: NewUser = serde_json::from_value(json!({"unrelated": true})).unwrap();
		assert_eq!(user.name, "");
		assert_eq!(user.email, "");

		let post: NewPost = serde_json::from_value(json!({})).unwrap();
		assert_eq!(post.user_id, 0);
	}
}
