use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, FromQueryResult, ModelTrait,
    Order, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    dto::foods::{CreateFoodRequest, UpdateFoodRequest},
    entity::{
        FoodItems, OrderLineItems, Restaurants,
        food_items::{ActiveModel as FoodActive, Column as FoodCol},
        order_line_items::Column as LineCol,
    },
    error::{AppError, AppResult},
    models::{FoodDetail, FoodItem},
    state::AppState,
};

/// Size of every ranking list (best sellers, most expensive, cheapest).
pub const RANKING_LIMIT: u64 = 5;
/// Maximum number of search hits returned.
pub const SEARCH_LIMIT: u64 = 10;

#[derive(Debug, FromQueryResult)]
struct FoodSales {
    food_id: i32,
    total_quantity: i64,
}

pub async fn list_foods(state: &AppState) -> AppResult<Vec<FoodDetail>> {
    let items = FoodItems::find()
        .find_also_related(Restaurants)
        .order_by_asc(FoodCol::Id)
        .all(state.db())
        .await?
        .into_iter()
        .map(|(food, restaurant)| FoodDetail::new(food, restaurant))
        .collect();
    Ok(items)
}

pub async fn get_food(state: &AppState, id: i32) -> AppResult<FoodDetail> {
    let found = FoodItems::find_by_id(id)
        .find_also_related(Restaurants)
        .one(state.db())
        .await?;
    let (food, restaurant) = found.ok_or(AppError::NotFound)?;
    Ok(FoodDetail::new(food, restaurant))
}

/// Food items of one restaurant, without the restaurant snapshot.
///
/// A restaurant with no items (or an unknown id) yields an empty list.
pub async fn list_foods_by_restaurant(
    state: &AppState,
    restaurant_id: i32,
) -> AppResult<Vec<FoodItem>> {
    let items = FoodItems::find()
        .filter(FoodCol::RestaurantId.eq(restaurant_id))
        .order_by_asc(FoodCol::Id)
        .all(state.db())
        .await?
        .into_iter()
        .map(FoodItem::from)
        .collect();
    Ok(items)
}

/// Top sellers by total ordered quantity.
///
/// Equal totals are ordered by food id ascending. Returns `NotFound` when no
/// order line exists.
pub async fn best_selling_foods(state: &AppState) -> AppResult<Vec<FoodItem>> {
    let ranked = OrderLineItems::find()
        .select_only()
        .column(LineCol::FoodId)
        .column_as(LineCol::Quantity.sum(), "total_quantity")
        .group_by(LineCol::FoodId)
        .order_by(LineCol::Quantity.sum(), Order::Desc)
        .order_by_asc(LineCol::FoodId)
        .limit(RANKING_LIMIT)
        .into_model::<FoodSales>()
        .all(state.db())
        .await?;

    if ranked.is_empty() {
        return Err(AppError::NotFound);
    }
    tracing::debug!(
        top_food_id = ranked[0].food_id,
        top_quantity = ranked[0].total_quantity,
        groups = ranked.len(),
        "ranked best sellers"
    );

    let ids: Vec<i32> = ranked.iter().map(|sales| sales.food_id).collect();
    let mut by_id: HashMap<i32, _> = FoodItems::find()
        .filter(FoodCol::Id.is_in(ids))
        .all(state.db())
        .await?
        .into_iter()
        .map(|food| (food.id, food))
        .collect();

    // The IN query loses the ranking order, so rebuild it from `ranked`.
    let items: Vec<FoodItem> = ranked
        .iter()
        .filter_map(|sales| by_id.remove(&sales.food_id))
        .map(FoodItem::from)
        .collect();

    if items.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(items)
}

pub async fn most_expensive_foods(state: &AppState) -> AppResult<Vec<FoodItem>> {
    top_by_price(state, Order::Desc).await
}

pub async fn cheapest_foods(state: &AppState) -> AppResult<Vec<FoodItem>> {
    top_by_price(state, Order::Asc).await
}

async fn top_by_price(state: &AppState, order: Order) -> AppResult<Vec<FoodItem>> {
    let items: Vec<FoodItem> = FoodItems::find()
        .order_by(FoodCol::Price, order)
        .order_by_asc(FoodCol::Id)
        .limit(RANKING_LIMIT)
        .all(state.db())
        .await?
        .into_iter()
        .map(FoodItem::from)
        .collect();

    if items.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(items)
}

/// Case-insensitive substring search over name and description.
///
/// Both sides are folded by Postgres (`ILIKE`), so the keyword and the
/// columns always use the same case rules.
///
/// An absent or empty keyword returns an empty list without querying.
pub async fn search_foods(state: &AppState, keyword: Option<&str>) -> AppResult<Vec<FoodItem>> {
    let Some(keyword) = keyword.filter(|k| !k.is_empty()) else {
        return Ok(Vec::new());
    };

    let pattern = LikeExpr::new(contains_pattern(keyword)).escape('\\');
    let condition = Condition::any()
        .add(Expr::col(FoodCol::Name).ilike(pattern.clone()))
        .add(Expr::col(FoodCol::Description).ilike(pattern));

    let items = FoodItems::find()
        .filter(condition)
        .order_by_asc(FoodCol::Id)
        .limit(SEARCH_LIMIT)
        .all(state.db())
        .await?
        .into_iter()
        .map(FoodItem::from)
        .collect();
    Ok(items)
}

/// `LIKE` pattern matching `keyword` anywhere, with `\` as escape character.
fn contains_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Insert a food item and return it with its restaurant snapshot.
pub async fn create_food(state: &AppState, payload: CreateFoodRequest) -> AppResult<FoodDetail> {
    let active = FoodActive {
        id: NotSet,
        restaurant_id: Set(payload.restaurant_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        image_url: Set(payload.image_url),
        created_at: Set(Utc::now().into()),
    };
    let inserted = active.insert(state.db()).await?;
    tracing::info!(
        food_id = inserted.id,
        restaurant_id = inserted.restaurant_id,
        "food item created"
    );

    let reloaded = FoodItems::find_by_id(inserted.id)
        .find_also_related(Restaurants)
        .one(state.db())
        .await?;
    let detail = match reloaded {
        Some((food, restaurant)) => FoodDetail::new(food, restaurant),
        None => FoodDetail::new(inserted, None),
    };
    Ok(detail)
}

/// Overwrite every writable column of food item `id`.
///
/// `created_at` is never touched. There is no version check, so concurrent
/// updates to the same row are last-write-wins.
pub async fn update_food(state: &AppState, id: i32, payload: UpdateFoodRequest) -> AppResult<()> {
    if payload.id != id {
        return Err(AppError::BadRequest(format!(
            "path id {id} does not match body id {}",
            payload.id
        )));
    }

    let active = FoodActive {
        id: NotSet,
        restaurant_id: Set(payload.restaurant_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        image_url: Set(payload.image_url),
        created_at: NotSet,
    };
    let result = FoodItems::update_many()
        .set(active)
        .filter(FoodCol::Id.eq(id))
        .exec(state.db())
        .await?;

    if result.rows_affected == 0 {
        return Err(DbErr::RecordNotUpdated.into());
    }
    tracing::info!(food_id = id, "food item updated");
    Ok(())
}

pub async fn delete_food(state: &AppState, id: i32) -> AppResult<()> {
    let Some(food) = FoodItems::find_by_id(id).one(state.db()).await? else {
        return Err(AppError::NotFound);
    };
    food.delete(state.db()).await?;
    tracing::info!(food_id = id, "food item deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use std::sync::Arc;

    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction, Value};

    use super::*;
    use crate::{
        entity::{food_items, restaurants},
        messages::MessageTable,
    };

    fn food(id: i32, restaurant_id: i32, name: &str, price: i64) -> food_items::Model {
        food_items::Model {
            id,
            restaurant_id,
            name: name.to_string(),
            description: Some(format!("{name} description")),
            price: Decimal::from(price),
            image_url: None,
            created_at: Utc::now().into(),
        }
    }

    fn restaurant(id: i32) -> restaurants::Model {
        restaurants::Model {
            id,
            name: "Quán Ngon".to_string(),
            address: Some("138 Nam Kỳ Khởi Nghĩa".to_string()),
            phone: Some("0283825".to_string()),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    fn sales(food_id: i32, total: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("food_id", Value::Int(Some(food_id))),
            ("total_quantity", Value::BigInt(Some(total))),
        ])
    }

    fn state(db: MockDatabase) -> AppState {
        AppState::new(db.into_connection(), MessageTable::default())
    }

    fn transaction_log(state: AppState) -> Vec<Transaction> {
        let AppState { orm, .. } = state;
        Arc::try_unwrap(orm)
            .expect("connection still shared")
            .into_transaction_log()
    }

    #[tokio::test]
    async fn list_foods_embeds_scalar_restaurant_snapshots() {
        let state = state(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([
            vec![
                (food(1, 7, "Phở bò", 45000), restaurant(7)),
                (food(2, 8, "Bún riêu", 40000), restaurant(8)),
            ],
        ]));

        let items = list_foods(&state).await.unwrap();
        let restaurant_ids: Vec<Option<i32>> = items
            .iter()
            .map(|f| f.restaurant.as_ref().map(|r| r.id))
            .collect();
        assert_eq!(restaurant_ids, vec![Some(7), Some(8)]);

        let json = serde_json::to_value(&items).unwrap();
        for item in json.as_array().unwrap() {
            let nested = item["restaurant"].as_object().unwrap();
            assert!(nested.values().all(|v| !v.is_array() && !v.is_object()));
        }

        let sql = format!("{:?}", transaction_log(state));
        assert!(sql.contains(r#"ORDER BY \"food_items\".\"id\" ASC"#));
    }

    #[tokio::test]
    async fn get_food_embeds_restaurant_snapshot() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![(food(1, 7, "Phở bò", 45000), restaurant(7))]]),
        );

        let detail = get_food(&state, 1).await.unwrap();
        assert_eq!(detail.id, 1);
        let snapshot = detail.restaurant.as_ref().expect("restaurant snapshot");
        assert_eq!(snapshot.id, 7);

        let json = serde_json::to_value(&detail).unwrap();
        let nested = json["restaurant"].as_object().unwrap();
        assert!(nested.values().all(|v| !v.is_array() && !v.is_object()));
    }

    #[tokio::test]
    async fn get_food_missing_is_not_found() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<(food_items::Model, restaurants::Model)>::new()]),
        );

        let err = get_food(&state, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn list_by_restaurant_with_no_items_is_empty() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<food_items::Model>::new()]),
        );

        let items = list_foods_by_restaurant(&state, 99).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn best_sellers_keep_ranking_order() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![sales(3, 40), sales(1, 12), sales(2, 12)]])
                // The IN lookup returns rows in arbitrary order.
                .append_query_results([vec![
                    food(1, 7, "Bún chả", 40000),
                    food(2, 7, "Nem rán", 30000),
                    food(3, 7, "Cơm tấm", 35000),
                ]]),
        );

        let items = best_selling_foods(&state).await.unwrap();
        let ids: Vec<i32> = items.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn best_sellers_without_orders_is_not_found() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<BTreeMap<&str, Value>>::new()]),
        );

        let err = best_selling_foods(&state).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn price_rankings_on_empty_store_are_not_found() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<food_items::Model>::new()])
                .append_query_results([Vec::<food_items::Model>::new()]),
        );

        assert!(matches!(
            most_expensive_foods(&state).await.unwrap_err(),
            AppError::NotFound
        ));
        assert!(matches!(
            cheapest_foods(&state).await.unwrap_err(),
            AppError::NotFound
        ));
    }

    #[tokio::test]
    async fn most_expensive_orders_by_price_then_id() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![food(2, 1, "B", 20), food(1, 1, "A", 5)]]),
        );

        most_expensive_foods(&state).await.unwrap();

        let log = transaction_log(state);
        let sql = format!("{log:?}");
        assert!(sql.contains(r#"ORDER BY \"food_items\".\"price\" DESC, \"food_items\".\"id\" ASC"#));
        assert!(sql.contains("LIMIT"));
    }

    #[tokio::test]
    async fn cheapest_orders_by_price_then_id() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![food(3, 1, "C", 1), food(1, 1, "A", 5)]]),
        );

        let items = cheapest_foods(&state).await.unwrap();
        assert_eq!(items.iter().map(|f| f.id).collect::<Vec<_>>(), vec![3, 1]);

        let sql = format!("{:?}", transaction_log(state));
        assert!(sql.contains(r#"ORDER BY \"food_items\".\"price\" ASC, \"food_items\".\"id\" ASC"#));
        assert!(sql.contains("LIMIT"));
    }

    #[tokio::test]
    async fn empty_keyword_skips_the_store() {
        let state = state(MockDatabase::new(DatabaseBackend::Postgres));

        assert!(search_foods(&state, None).await.unwrap().is_empty());
        assert!(search_foods(&state, Some("")).await.unwrap().is_empty());
        assert!(transaction_log(state).is_empty());
    }

    #[tokio::test]
    async fn search_matches_name_or_description_case_insensitively() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![food(1, 7, "Phở bò", 45000)]]),
        );

        let items = search_foods(&state, Some("PHỞ")).await.unwrap();
        assert_eq!(items.len(), 1);

        let sql = format!("{:?}", transaction_log(state));
        assert!(sql.contains(r#"\"name\" ILIKE"#));
        assert!(sql.contains(r#"\"description\" ILIKE"#));
        assert!(sql.contains("%PHỞ%"));
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Cà Phê"), "%Cà Phê%");
        assert_eq!(contains_pattern("50%_off"), r"%50\%\_off%");
    }

    #[tokio::test]
    async fn create_returns_reloaded_detail() {
        let created = food(10, 7, "Bánh mì", 20000);
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![created.clone()]])
                .append_query_results([vec![(created.clone(), restaurant(7))]]),
        );

        let detail = create_food(
            &state,
            CreateFoodRequest {
                restaurant_id: 7,
                name: "Bánh mì".into(),
                description: None,
                price: Decimal::from(20000),
                image_url: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(detail.id, 10);
        assert_eq!(detail.restaurant.map(|r| r.id), Some(7));

        let sql = format!("{:?}", transaction_log(state));
        assert!(!sql.contains("INSERT INTO \\\"restaurants\\\""));
    }

    #[tokio::test]
    async fn update_with_mismatched_id_is_rejected_without_queries() {
        let state = state(MockDatabase::new(DatabaseBackend::Postgres));

        let err = update_food(
            &state,
            1,
            UpdateFoodRequest {
                id: 2,
                restaurant_id: 7,
                name: "Gỏi cuốn".into(),
                description: None,
                price: Decimal::from(25000),
                image_url: None,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(transaction_log(state).is_empty());
    }

    #[tokio::test]
    async fn update_leaves_created_at_alone() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
        );

        update_food(
            &state,
            3,
            UpdateFoodRequest {
                id: 3,
                restaurant_id: 7,
                name: "Chè".into(),
                description: Some("Chè ba màu".into()),
                price: Decimal::from(15000),
                image_url: None,
            },
        )
        .await
        .unwrap();

        let sql = format!("{:?}", transaction_log(state));
        assert!(sql.contains("UPDATE"));
        assert!(!sql.contains("created_at"));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_a_store_failure() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }]),
        );

        let err = update_food(
            &state,
            3,
            UpdateFoodRequest {
                id: 3,
                restaurant_id: 7,
                name: "Chè".into(),
                description: None,
                price: Decimal::from(15000),
                image_url: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::OrmError(DbErr::RecordNotUpdated)));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found_and_deletes_nothing() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<food_items::Model>::new()]),
        );

        let err = delete_food(&state, 5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        let sql = format!("{:?}", transaction_log(state));
        assert!(!sql.contains("DELETE"));
    }

    #[tokio::test]
    async fn store_errors_propagate_as_orm_errors() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection reset".into())]),
        );

        let err = list_foods(&state).await.unwrap_err();
        assert!(matches!(err, AppError::OrmError(_)));
    }
}
