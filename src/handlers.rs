pub mod auth;
pub mod establishments;
pub mod products;
pub mod users;
