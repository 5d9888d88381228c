mod models;
mod state;
pub mod files;
pub mod negotiate;

pub use files::serve_file;
pub use models::AppState;
pub use negotiate::negotiate;
