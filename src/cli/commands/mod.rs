pub mod database;
pub mod summary;
