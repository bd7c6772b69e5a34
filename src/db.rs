pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::{ProductPredicate, ProductRepository};
pub mod establishment_repo;
pub use establishment_repo::EstablishmentRepository;
