pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::HomeApiClient;
pub use app::{router, AppState};
pub use core::{engine::PriceEngine, ConfigProvider, PriceError, PriceRequest, PriceResult};
pub use utils::error::{DopcError, Result};
