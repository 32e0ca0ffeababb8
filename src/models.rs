//! Response projections.
//!
//! These types only carry scalar columns. A [`FoodDetail`] embeds a
//! [`RestaurantSnapshot`], but a snapshot never lists the restaurant's food
//! items, so serialized output cannot contain a cycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{food_items, restaurants};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FoodItem {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "45000.00")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RestaurantSnapshot {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FoodDetail {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "45000.00")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Absent only if the referenced restaurant row vanished between reads.
    pub restaurant: Option<RestaurantSnapshot>,
}

impl From<food_items::Model> for FoodItem {
    fn from(model: food_items::Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            name: model.name,
            description: model.description,
            price: model.price,
            image_url: model.image_url,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<restaurants::Model> for RestaurantSnapshot {
    fn from(model: restaurants::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            phone: model.phone,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl FoodDetail {
    pub fn new(food: food_items::Model, restaurant: Option<restaurants::Model>) -> Self {
        Self {
            id: food.id,
            restaurant_id: food.restaurant_id,
            name: food.name,
            description: food.description,
            price: food.price,
            image_url: food.image_url,
            created_at: food.created_at.with_timezone(&Utc),
            restaurant: restaurant.map(RestaurantSnapshot::from),
        }
    }
}
