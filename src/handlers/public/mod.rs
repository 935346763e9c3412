// Public handlers: no token required.

pub mod auth;
pub mod status;
