pub mod app;
pub mod error;
pub mod handlers;
pub mod reset_keys;
pub mod state;

pub use app::build_router;
pub use app::build_router_with_cors;
