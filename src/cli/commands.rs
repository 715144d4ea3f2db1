pub mod import_history;
pub mod initdb;
pub mod predict;
pub mod serve;

pub use import_history::import_history;
pub use initdb::init_database;
pub use predict::predict;
pub use serve::serve;
