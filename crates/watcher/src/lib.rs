pub mod dir;
pub mod errors;
pub mod models;

pub use errors::WatcherError;
pub use models::DirWatcher;
