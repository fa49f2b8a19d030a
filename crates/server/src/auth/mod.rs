pub mod jwt;
pub mod models;

pub use jwt::*;
pub use models::*;
