use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::foods::{CreateFoodRequest, FoodDetailList, FoodList, SearchQuery, UpdateFoodRequest},
    models::{FoodDetail, FoodItem, RestaurantSnapshot},
    response::{ApiResponse, Meta},
    routes::{foods, health},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        foods::list_foods,
        foods::get_food,
        foods::list_foods_by_restaurant,
        foods::best_selling_foods,
        foods::most_expensive_foods,
        foods::cheapest_foods,
        foods::search_foods,
        foods::create_food,
        foods::update_food,
        foods::delete_food
    ),
    components(
        schemas(
            FoodItem,
            FoodDetail,
            RestaurantSnapshot,
            CreateFoodRequest,
            UpdateFoodRequest,
            SearchQuery,
            FoodList,
            FoodDetailList,
            health::HealthData,
            Meta,
            ApiResponse<FoodDetail>,
            ApiResponse<FoodList>,
            ApiResponse<FoodDetailList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Foods", description = "Food item endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
