use super::decode;
use crate::error::ApiResult;
use crate::models::*;
use crate::AppState;
use axum::{
	body::Bytes,
	extract::{rejection::*, *},
};

pub async fn get_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
	let users = state.db.find_users().await?;
	Ok(Json(users))
}

pub async fn get_user(
	id: Result<Path<i64>, PathRejection>,
	State(state): State<AppState>,
) -> ApiResult<Json<User>> {
	let Path(id) = id?;
	let mut user = state.db.find_user(id).await?;
	user.posts = state.db.find_user_posts(user.id).await?;
	Ok(Json(user))
}

pub async fn create_user(
	State(state): State<AppState>,
	body: Bytes,
) -> ApiResult<Json<User>> {
	let user: NewUser = decode(&body)?;
	let user = state.db.create_user(user).await?;
	tracing::info!(id = user.id, "created user");
	Ok(Json(user))
}

pub async fn delete_user(
	id: Result<Path<i64>, PathRejection>,
	State(state): State<AppState>,
) -> ApiResult<Json<User>> {
	let Path(id) = id?;
	let user = state.db.delete_user(id).await?;
	tracing::info!(id, "deleted user");
	Ok(Json(user))
}
