use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::FoodItem;

/// Payload for creating a food item.
///
/// The item is linked to its restaurant by id only. Any nested restaurant
/// object a client sends is not part of this type and is dropped during
/// deserialization.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFoodRequest {
    pub restaurant_id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "45000.00")]
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Full replacement of a food item, not a partial patch.
///
/// Every writable column is overwritten. Optional fields left out of the
/// body are stored as null, so clients must send the complete record.
/// Leaving out a required field (`restaurant_id`, `name`, `price`) does not
/// write a zero value: the body is rejected with a 400 before any write.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFoodRequest {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "45000.00")]
    pub price: Decimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring matched against name and description.
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FoodList {
    #[schema(value_type = Vec<FoodItem>)]
    pub items: Vec<FoodItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FoodDetailList {
    #[schema(value_type = Vec<crate::models::FoodDetail>)]
    pub items: Vec<crate::models::FoodDetail>,
}
