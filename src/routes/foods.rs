use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use crate::{
    dto::foods::{CreateFoodRequest, FoodDetailList, FoodList, SearchQuery, UpdateFoodRequest},
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    messages::FoodOperation,
    models::{FoodDetail, FoodItem},
    response::{ApiResponse, Meta},
    services::food_service,
    state::AppState,
};

type ApiResult<T> = Result<T, ApiError>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_foods).post(create_food))
        .route("/bestselling", get(best_selling_foods))
        .route("/mostexpensive", get(most_expensive_foods))
        .route("/cheapest", get(cheapest_foods))
        .route("/search", get(search_foods))
        .route("/restaurant/{restaurant_id}", get(list_foods_by_restaurant))
        .route(
            "/{id}",
            get(get_food).put(update_food).delete(delete_food),
        )
}

fn food_list(message: &str, items: Vec<FoodItem>) -> Json<ApiResponse<FoodList>> {
    let meta = Meta::count(items.len());
    Json(ApiResponse::success(message, FoodList { items }, Some(meta)))
}

#[utoipa::path(
    get,
    path = "/api/foods",
    responses(
        (status = 200, description = "All food items with their restaurant", body = ApiResponse<FoodDetailList>),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn list_foods(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FoodDetailList>>> {
    let items = food_service::list_foods(&state)
        .await
        .map_err(|err| state.messages.reject(FoodOperation::List, err))?;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Foods",
        FoodDetailList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/foods/{id}",
    params(
        ("id" = i32, Path, description = "Food item ID")
    ),
    responses(
        (status = 200, description = "Food item with its restaurant", body = ApiResponse<FoodDetail>),
        (status = 404, description = "Food item not found"),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn get_food(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<ApiResponse<FoodDetail>>> {
    let food = food_service::get_food(&state, id)
        .await
        .map_err(|err| state.messages.reject(FoodOperation::Get, err))?;
    Ok(Json(ApiResponse::success("Food", food, None)))
}

#[utoipa::path(
    get,
    path = "/api/foods/restaurant/{restaurant_id}",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Food items of the restaurant, possibly empty", body = ApiResponse<FoodList>),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn list_foods_by_restaurant(
    State(state): State<AppState>,
    ApiPath(restaurant_id): ApiPath<i32>,
) -> ApiResult<Json<ApiResponse<FoodList>>> {
    let items = food_service::list_foods_by_restaurant(&state, restaurant_id)
        .await
        .map_err(|err| state.messages.reject(FoodOperation::ListByRestaurant, err))?;
    Ok(food_list("Foods by restaurant", items))
}

#[utoipa::path(
    get,
    path = "/api/foods/bestselling",
    responses(
        (status = 200, description = "Up to 5 best selling food items", body = ApiResponse<FoodList>),
        (status = 404, description = "No orders yet"),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn best_selling_foods(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FoodList>>> {
    let items = food_service::best_selling_foods(&state)
        .await
        .map_err(|err| state.messages.reject(FoodOperation::BestSelling, err))?;
    Ok(food_list("Best selling foods", items))
}

#[utoipa::path(
    get,
    path = "/api/foods/mostexpensive",
    responses(
        (status = 200, description = "Up to 5 food items, highest price first", body = ApiResponse<FoodList>),
        (status = 404, description = "No food items"),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn most_expensive_foods(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FoodList>>> {
    let items = food_service::most_expensive_foods(&state)
        .await
        .map_err(|err| state.messages.reject(FoodOperation::MostExpensive, err))?;
    Ok(food_list("Most expensive foods", items))
}

#[utoipa::path(
    get,
    path = "/api/foods/cheapest",
    responses(
        (status = 200, description = "Up to 5 food items, lowest price first", body = ApiResponse<FoodList>),
        (status = 404, description = "No food items"),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn cheapest_foods(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FoodList>>> {
    let items = food_service::cheapest_foods(&state)
        .await
        .map_err(|err| state.messages.reject(FoodOperation::Cheapest, err))?;
    Ok(food_list("Cheapest foods", items))
}

#[utoipa::path(
    get,
    path = "/api/foods/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Up to 10 matches; empty when no keyword is given", body = ApiResponse<FoodList>),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn search_foods(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<ApiResponse<FoodList>>> {
    let items = food_service::search_foods(&state, query.keyword.as_deref())
        .await
        .map_err(|err| state.messages.reject(FoodOperation::Search, err))?;
    Ok(food_list("Search results", items))
}

#[utoipa::path(
    post,
    path = "/api/foods",
    request_body = CreateFoodRequest,
    responses(
        (status = 201, description = "Created food item", body = ApiResponse<FoodDetail>,
            headers(("location" = String, description = "URL of the new food item"))),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn create_food(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateFoodRequest>,
) -> ApiResult<impl IntoResponse> {
    let food = food_service::create_food(&state, payload)
        .await
        .map_err(|err| state.messages.reject(FoodOperation::Create, err))?;
    let location = format!("/api/foods/{}", food.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success("Food created", food, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/foods/{id}",
    params(
        ("id" = i32, Path, description = "Food item ID, must equal the body id")
    ),
    request_body = UpdateFoodRequest,
    responses(
        (status = 204, description = "Food item replaced"),
        (status = 400, description = "Path id and body id differ, or malformed body"),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn update_food(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<UpdateFoodRequest>,
) -> ApiResult<StatusCode> {
    food_service::update_food(&state, id, payload)
        .await
        .map_err(|err| state.messages.reject(FoodOperation::Update, err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/foods/{id}",
    params(
        ("id" = i32, Path, description = "Food item ID")
    ),
    responses(
        (status = 204, description = "Food item deleted"),
        (status = 404, description = "Food item not found"),
        (status = 500, description = "Store failure"),
    ),
    tag = "Foods"
)]
pub async fn delete_food(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    food_service::delete_food(&state, id)
        .await
        .map_err(|err| state.messages.reject(FoodOperation::Delete, err))?;
    Ok(StatusCode::NO_CONTENT)
}
