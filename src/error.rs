use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),
}

pub type AppResult<T> = Result<T, AppError>;

/// Error as seen by HTTP clients: a status code and a readable message.
///
/// Built from an [`AppError`] by [`crate::messages::MessageTable::reject`].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse {
            message: self.message,
            data: None,
            meta: Some(Meta::empty()),
        };

        (self.status, Json(body)).into_response()
    }
}
