use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
pub struct Meta {
    /// Number of items in `data` for list responses.
    pub count: Option<usize>,
}

impl Meta {
    pub fn count(count: usize) -> Self {
        Self { count: Some(count) }
    }

    pub fn empty() -> Self {
        Self { count: None }
    }
}

/// JSON envelope shared by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
