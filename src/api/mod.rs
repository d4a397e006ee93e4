//! HTTP API handlers for qualeval

pub mod health;
pub mod pages;
pub mod session;
pub mod submit;

pub use health::health_routes;
pub use pages::{complete, evaluate_item, home};
pub use session::new_session_id;
pub use submit::submit;
