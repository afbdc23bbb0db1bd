use crate::domain::model::{VenuePricing, VenueStatic};
use crate::domain::ports::{LocationSource, PricingSource};
use crate::utils::error::PriceError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_REQUEST_DEADLINE: Duration = Duration::from_secs(5);

/// Fetches static and pricing data for one venue concurrently.
///
/// Resolves on the first upstream error, on both successes, or when `deadline`
/// elapses, whichever comes first. Every call gets its own cancellation token,
/// cancelled on return so a lookup still in flight is torn down with it.
pub async fn fetch_venue(
    location: &dyn LocationSource,
    pricing: &dyn PricingSource,
    venue_slug: &str,
    deadline: Duration,
) -> Result<(VenueStatic, VenuePricing), PriceError> {
    let cancel = CancellationToken::new();
    let _cancel_on_return = cancel.clone().drop_guard();

    let both = async {
        tokio::try_join!(
            location.fetch_static(venue_slug, &cancel),
            pricing.fetch_pricing(venue_slug, &cancel),
        )
    };

    match tokio::time::timeout(deadline, both).await {
        Ok(Ok(venue)) => Ok(venue),
        Ok(Err(err)) => {
            tracing::warn!(venue = venue_slug, error = %err, "venue lookup failed");
            Err(PriceError::UpstreamFetchFailed(err))
        }
        Err(_) => {
            tracing::warn!(venue = venue_slug, ?deadline, "venue lookups timed out");
            Err(PriceError::UpstreamTimeout { deadline })
        }
    }
}
