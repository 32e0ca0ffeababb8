use food_menu_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;
    let restaurant_id = ensure_restaurant(
        &pool,
        "Quán Ăn Ngon",
        "138 Nam Kỳ Khởi Nghĩa, Quận 1",
        "028 3825 7179",
    )
    .await?;
    let food_ids = seed_foods(&pool, restaurant_id).await?;
    seed_order_lines(&pool, &food_ids).await?;

    println!("Seed completed. Restaurant ID: {restaurant_id}");
    Ok(())
}

async fn ensure_restaurant(
    pool: &sqlx::PgPool,
    name: &str,
    address: &str,
    phone: &str,
) -> anyhow::Result<i32> {
    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM restaurants WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        println!("Restaurant {name} already present");
        return Ok(id);
    }

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO restaurants (name, address, phone, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(address)
    .bind(phone)
    .bind("Món ăn đường phố ba miền")
    .fetch_one(pool)
    .await?;

    println!("Seeded restaurant {name}");
    Ok(id)
}

async fn seed_foods(pool: &sqlx::PgPool, restaurant_id: i32) -> anyhow::Result<Vec<i32>> {
    let foods = vec![
        ("Phở bò tái", "Nước dùng hầm xương 12 tiếng", 65000),
        ("Bún chả Hà Nội", "Chả nướng than hoa, bún tươi", 55000),
        ("Cơm tấm sườn bì", "Sườn nướng mật ong", 50000),
        ("Bánh xèo miền Tây", "Bánh giòn nhân tôm thịt", 45000),
        ("Gỏi cuốn", "Tôm, thịt, rau sống, chấm tương", 30000),
        ("Chè ba màu", "Đậu xanh, đậu đỏ, thạch", 20000),
    ];

    let mut ids = Vec::with_capacity(foods.len());
    for (name, desc, price) in foods {
        let existing: Option<(i32,)> = sqlx::query_as(
            "SELECT id FROM food_items WHERE restaurant_id = $1 AND name = $2",
        )
        .bind(restaurant_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        let id = match existing {
            Some((id,)) => id,
            None => {
                let (id,): (i32,) = sqlx::query_as(
                    r#"
                    INSERT INTO food_items (restaurant_id, name, description, price)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(restaurant_id)
                .bind(name)
                .bind(desc)
                .bind(Decimal::from(price))
                .fetch_one(pool)
                .await?;
                id
            }
        };
        ids.push(id);
    }

    println!("Seeded food items");
    Ok(ids)
}

async fn seed_order_lines(pool: &sqlx::PgPool, food_ids: &[i32]) -> anyhow::Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_line_items")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("Order lines already present");
        return Ok(());
    }

    // Quantities decrease along the menu so best sellers are predictable.
    for (order_id, food_id) in (1..).zip(food_ids) {
        let quantity = (food_ids.len() as i32 - order_id + 1) * 2;
        sqlx::query("INSERT INTO order_line_items (order_id, food_id, quantity) VALUES ($1, $2, $3)")
            .bind(order_id)
            .bind(*food_id)
            .bind(quantity)
            .execute(pool)
            .await?;
    }

    println!("Seeded order lines");
    Ok(())
}
