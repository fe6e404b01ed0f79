pub mod posts;
pub mod users;

use crate::error::ApiResult;
use crate::AppState;
use axum::{routing::*, Router};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;

pub fn route(state: AppState) -> Router {
	Router::new()
		.route("/users", get(users::get_users))
		.route("/user/:id", get(users::get_user))
		.route("/create/user", post(users::create_user))
		.route("/delete/user/:id", delete(users::delete_user))
		.route("/posts", get(posts::get_posts))
		.route("/post/:id", get(posts::get_post))
		.route("/create/post", post(posts::create_post))
		.route("/delete/post/:id", delete(posts::delete_post))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

// Bodies are decoded whatever the Content-Type says, clients were never
// required to send one.
fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
	Ok(serde_json::from_slice(body)?)
}
