pub mod auth;
pub mod credentials;
pub mod establishment_service;
pub mod product_filter;
pub mod product_service;
pub mod user_service;
