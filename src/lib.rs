pub mod config;
pub mod error;
pub mod models;
pub mod queries;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
