pub mod errors;
pub mod handlers;
pub mod models;

pub use errors::ApiError;
pub use handlers::*;
pub use models::*;
