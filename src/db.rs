pub mod error;
pub mod models;
pub mod region_repository;

pub use error::DbError;
pub use models::*;
pub use region_repository::RegionRepository;
