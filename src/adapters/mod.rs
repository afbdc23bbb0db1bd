// Adapters layer: concrete implementations of the domain ports.

pub mod home_api;
pub mod payload;

pub use home_api::HomeApiClient;
