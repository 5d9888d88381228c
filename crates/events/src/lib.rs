pub mod bus;
pub mod models;

pub use models::{AppEvent, EventBus};
