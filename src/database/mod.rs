pub mod error;
pub mod gateway;
pub mod manager;
pub mod models;

pub use error::{ErrorKind, GatewayError};
pub use gateway::{CommandOutcome, Gateway, Param, PgGateway, Row, SqlType, SqlTyped, Statement};
pub use manager::DatabaseManager;
