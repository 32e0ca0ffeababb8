//! Human-readable error messages returned to clients.
//!
//! The defaults are the Vietnamese strings the menu front-end already shows.
//! A JSON file can override any subset of them; missing keys keep their
//! default.

use std::path::Path;

use anyhow::Context;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::{ApiError, AppError};

/// The food endpoints, used to pick a message and to tag log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodOperation {
    List,
    Get,
    ListByRestaurant,
    BestSelling,
    MostExpensive,
    Cheapest,
    Search,
    Create,
    Update,
    Delete,
}

impl FoodOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodOperation::List => "list_foods",
            FoodOperation::Get => "get_food",
            FoodOperation::ListByRestaurant => "list_foods_by_restaurant",
            FoodOperation::BestSelling => "best_selling_foods",
            FoodOperation::MostExpensive => "most_expensive_foods",
            FoodOperation::Cheapest => "cheapest_foods",
            FoodOperation::Search => "search_foods",
            FoodOperation::Create => "create_food",
            FoodOperation::Update => "update_food",
            FoodOperation::Delete => "delete_food",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessageTable {
    pub food_not_found: String,
    pub best_selling_not_found: String,
    pub id_mismatch: String,
    pub invalid_request: String,
    pub list_failed: String,
    pub get_failed: String,
    pub list_by_restaurant_failed: String,
    pub best_selling_failed: String,
    pub most_expensive_failed: String,
    pub cheapest_failed: String,
    pub search_failed: String,
    pub create_failed: String,
    pub update_failed: String,
    pub delete_failed: String,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self {
            food_not_found: "Không tìm thấy món ăn".to_string(),
            best_selling_not_found: "Không tìm thấy món ăn bán chạy".to_string(),
            id_mismatch: "ID không khớp".to_string(),
            invalid_request: "Dữ liệu yêu cầu không hợp lệ".to_string(),
            list_failed: "Đã xảy ra lỗi khi lấy danh sách món ăn".to_string(),
            get_failed: "Đã xảy ra lỗi khi lấy thông tin món ăn".to_string(),
            list_by_restaurant_failed: "Đã xảy ra lỗi khi lấy danh sách món ăn theo nhà hàng"
                .to_string(),
            best_selling_failed: "Đã xảy ra lỗi khi lấy món ăn bán chạy nhất".to_string(),
            most_expensive_failed: "Đã xảy ra lỗi khi lấy món ăn đắt nhất".to_string(),
            cheapest_failed: "Đã xảy ra lỗi khi lấy món ăn rẻ nhất".to_string(),
            search_failed: "Đã xảy ra lỗi khi tìm kiếm món ăn".to_string(),
            create_failed: "Đã xảy ra lỗi khi tạo món ăn mới".to_string(),
            update_failed: "Đã xảy ra lỗi khi cập nhật món ăn".to_string(),
            delete_failed: "Đã xảy ra lỗi khi xóa món ăn".to_string(),
        }
    }
}

impl MessageTable {
    /// Load overrides from a JSON file, or the defaults when no path is given.
    pub async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading message table {}", path.display()))?;
        let table = serde_json::from_str(&raw)
            .with_context(|| format!("parsing message table {}", path.display()))?;
        Ok(table)
    }

    pub fn not_found(&self, operation: FoodOperation) -> &str {
        match operation {
            FoodOperation::BestSelling => &self.best_selling_not_found,
            _ => &self.food_not_found,
        }
    }

    pub fn failure(&self, operation: FoodOperation) -> &str {
        match operation {
            FoodOperation::List => &self.list_failed,
            FoodOperation::Get => &self.get_failed,
            FoodOperation::ListByRestaurant => &self.list_by_restaurant_failed,
            FoodOperation::BestSelling => &self.best_selling_failed,
            FoodOperation::MostExpensive => &self.most_expensive_failed,
            FoodOperation::Cheapest => &self.cheapest_failed,
            FoodOperation::Search => &self.search_failed,
            FoodOperation::Create => &self.create_failed,
            FoodOperation::Update => &self.update_failed,
            FoodOperation::Delete => &self.delete_failed,
        }
    }

    /// Turn a service error into the response sent to the client.
    ///
    /// This is the only place that decides status codes for the food
    /// endpoints. Store failures of any kind become a 500 with the
    /// operation's fixed message; the underlying cause only reaches the logs.
    pub fn reject(&self, operation: FoodOperation, err: AppError) -> ApiError {
        let op = operation.as_str();
        match &err {
            AppError::NotFound => {
                tracing::debug!(operation = op, "not found");
                ApiError::new(StatusCode::NOT_FOUND, self.not_found(operation))
            }
            AppError::BadRequest(reason) => {
                tracing::debug!(operation = op, reason = %reason, "bad request");
                ApiError::new(StatusCode::BAD_REQUEST, &self.id_mismatch)
            }
            AppError::OrmError(source) => {
                tracing::error!(operation = op, error = %source, "store failure");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, self.failure(operation))
            }
        }
    }

    /// Reject a request whose path, query or body could not be extracted.
    ///
    /// Always a 400 with the `invalid_request` message, whatever status the
    /// extractor itself would have chosen.
    pub fn reject_request(&self, reason: &str) -> ApiError {
        tracing::debug!(reason = %reason, "malformed request");
        ApiError::new(StatusCode::BAD_REQUEST, &self.invalid_request)
    }
}
