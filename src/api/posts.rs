use super::decode;
use crate::error::ApiResult;
use crate::models::*;
use crate::AppState;
use axum::{
	body::Bytes,
	extract::{rejection::*, *},
};

pub async fn get_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
	let posts = state.db.find_posts().await?;
	Ok(Json(posts))
}

pub async fn get_post(
	id: Result<Path<i64>, PathRejection>,
	State(state): State<AppState>,
) -> ApiResult<Json<Post>> {
	let Path(id) = id?;
	let post = state.db.find_post(id).await?;
	Ok(Json(post))
}

pub async fn create_post(
	State(state): State<AppState>,
	body: Bytes,
) -> ApiResult<Json<Post>> {
	let post: NewPost = decode(&body)?;
	let post = state.db.create_post(post).await?;
	tracing::info!(id = post.id, user_id = post.user_id, "created post");
	Ok(Json(post))
}

pub async fn delete_post(
	id: Result<Path<i64>, PathRejection>,
	State(state): State<AppState>,
) -> ApiResult<Json<Post>> {
	let Path(id) = id?;
	let post = state.db.delete_post(id).await?;
	tracing::info!(id, "deleted post");
	Ok(Json(post))
}
