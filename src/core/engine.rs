use crate::core::distance::haversine_meters;
use crate::core::fees;
use crate::core::fetch::{fetch_venue, DEFAULT_REQUEST_DEADLINE};
use crate::core::range::{select_range, RangeOutcome};
use crate::core::{LocationSource, PriceRequest, PriceResult, PricingSource};
use crate::utils::error::{PriceError, Unavailability};
use std::sync::Arc;
use std::time::Duration;

/// Computes delivery order prices from two venue lookups.
#[derive(Clone)]
pub struct PriceEngine {
    location: Arc<dyn LocationSource>,
    pricing: Arc<dyn PricingSource>,
    deadline: Duration,
}

impl PriceEngine {
    pub fn new(location: Arc<dyn LocationSource>, pricing: Arc<dyn PricingSource>) -> Self {
        Self {
            location,
            pricing,
            deadline: DEFAULT_REQUEST_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub async fn compute_price(&self, request: &PriceRequest) -> Result<PriceResult, PriceError> {
        self.compute_price_with_deadline(request, self.deadline).await
    }

    pub async fn compute_price_with_deadline(
        &self,
        request: &PriceRequest,
        deadline: Duration,
    ) -> Result<PriceResult, PriceError> {
        let venue_slug = request.venue_slug();
        tracing::debug!(venue = venue_slug, ?deadline, "fetching venue data");

        let (venue, pricing) =
            fetch_venue(self.location.as_ref(), self.pricing.as_ref(), venue_slug, deadline)
                .await?;

        let distance = haversine_meters(request.user_location(), venue.location);

        let range = match select_range(&pricing.distance_ranges, distance) {
            RangeOutcome::Selected(range) => range,
            RangeOutcome::Unavailable => {
                tracing::warn!(venue = venue_slug, distance, "no distance range matched");
                return Err(PriceError::DeliveryUnavailable {
                    distance,
                    reason: Unavailability::NoMatchingRange,
                });
            }
            RangeOutcome::Blocked { from } => {
                tracing::warn!(
                    venue = venue_slug,
                    distance,
                    cutoff = from,
                    "delivery cutoff reached"
                );
                return Err(PriceError::DeliveryUnavailable {
                    distance,
                    reason: Unavailability::CutoffReached { from },
                });
            }
        };

        let result = fees::compose(
            request.cart_value(),
            venue.order_minimum_no_surcharge,
            pricing.base_price,
            range,
            distance,
        )
        .inspect_err(|err| {
            tracing::warn!(venue = venue_slug, distance, error = %err, "price out of range")
        })?;

        tracing::info!(
            venue = venue_slug,
            distance,
            fee = result.delivery.fee,
            surcharge = result.small_order_surcharge,
            total = result.total_price,
            "price computed"
        );

        Ok(result)
    }
}
