pub mod helpers;
pub mod middleware;

pub use middleware::require_manager;
