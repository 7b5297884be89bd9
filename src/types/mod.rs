pub mod category;
pub mod filter;
pub mod schema;
pub mod views;
