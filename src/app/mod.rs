// Inbound HTTP transport: query parsing, routing and error bodies.

pub mod requests;
pub mod responses;
pub mod routes;

pub use routes::{router, AppState};
