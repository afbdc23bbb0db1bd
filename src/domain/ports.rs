use crate::domain::model::{VenuePricing, VenueStatic};
use crate::utils::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Coordinates and surcharge threshold for a venue.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn fetch_static(
        &self,
        venue_slug: &str,
        cancel: &CancellationToken,
    ) -> Result<VenueStatic, FetchError>;
}

/// Base price and distance ranges for a venue.
#[async_trait]
pub trait PricingSource: Send + Sync {
    async fn fetch_pricing(
        &self,
        venue_slug: &str,
        cancel: &CancellationToken,
    ) -> Result<VenuePricing, FetchError>;
}

pub trait ConfigProvider: Send + Sync {
    fn port(&self) -> u16;
    fn api_base_url(&self) -> &str;
    /// Shared deadline covering both upstream lookups of one request.
    fn request_deadline(&self) -> Duration;
    /// Per-call HTTP timeout applied by the upstream client.
    fn upstream_timeout(&self) -> Duration;
    fn json_logs(&self) -> bool;
}
