//! HTTP API: bill and item controllers plus service endpoints.

pub mod bills;
pub mod docs;
pub mod handlers;
pub mod items;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_router, with_frontend};
