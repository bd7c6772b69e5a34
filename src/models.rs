pub mod auth;
pub mod establishment;
pub mod product;
pub mod user;
