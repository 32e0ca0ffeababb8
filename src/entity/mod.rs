pub mod food_items;
pub mod order_line_items;
pub mod restaurants;

pub use food_items::Entity as FoodItems;
pub use order_line_items::Entity as OrderLineItems;
pub use restaurants::Entity as Restaurants;
