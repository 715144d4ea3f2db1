pub mod dashboard;
pub mod health;
pub mod prices;
pub mod summary;
