use crate::database;
use axum::{
	extract::rejection::PathRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("{table} {id} not found")]
	NotFound { table: &'static str, id: i64 },
	#[error("{0}")]
	Conflict(String),
	#[error("database error: {0}")]
	Database(database::Error),
	#[error("invalid JSON body: {0}")]
	Body(#[from] serde_json::Error),
	#[error(transparent)]
	Path(#[from] PathRejection),
}

impl From<database::Error> for ApiError {
	fn from(err: database::Error) -> Self {
		match err {
			database::Error::NotFound { table, id } => Self::NotFound { table, id },
			database::Error::DuplicateEmail(_) => Self::Conflict(err.to_string()),
			err => Self::Database(err),
		}
	}
}

impl ApiError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::NotFound { .. } => StatusCode::NOT_FOUND,
			Self::Conflict(_) => StatusCode::CONFLICT,
			Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::Body(_) => StatusCode::BAD_REQUEST,
			Self::Path(rejection) => rejection.status(),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		let message = match &self {
			Self::Database(err) => {
				tracing::error!("database error: {err}");
				String::from("internal database error")
			}
			Self::Path(rejection) => rejection.body_text(),
			_ => self.to_string(),
		};

		let body = Json(json!({
			"error": message,
			"status": status.as_u16(),
		}));
		(status, body).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_database_errors_to_statuses() {
		let not_found: ApiError = database::Error::NotFound { table: "post", id: 4 }.into();
		assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
		assert_eq!(not_found.to_string(), "post 4 not found");

		let conflict: ApiError = database::Error::DuplicateEmail(String::from("a@b.c")).into();
		assert_eq!(conflict.status(), StatusCode::CONFLICT);

		let internal: ApiError = database::Error::Sqlx(sqlx::Error::PoolTimedOut).into();
		assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn unparseable_body_is_bad_request() {
		let err: ApiError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
		assert_eq!(err.status(), StatusCode::BAD_REQUEST);
		assert!(err.to_string().starts_with("invalid JSON body"));
	}
}
