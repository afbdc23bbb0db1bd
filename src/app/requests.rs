//! Query-string DTO for the price endpoint.

use crate::domain::model::{Coordinate, PriceRequest};
use crate::utils::error::{InvalidValue, PriceError};
use crate::utils::validation::validate_range;
use serde::Deserialize;

/// Raw query parameters. Everything stays a string until validated so a
/// malformed number is reported against its field, not as a generic 400.
#[derive(Debug, Default, Deserialize)]
pub struct PriceQuery {
    pub venue_slug: Option<String>,
    pub cart_value: Option<String>,
    pub user_lat: Option<String>,
    pub user_lon: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TryFrom<PriceQuery> for PriceRequest {
    type Error = PriceError;

    fn try_from(query: PriceQuery) -> Result<Self, Self::Error> {
        let (Some(venue_slug), Some(cart), Some(lat), Some(lon)) = (
            present(&query.venue_slug),
            present(&query.cart_value),
            present(&query.user_lat),
            present(&query.user_lon),
        ) else {
            let missing: Vec<&str> = [
                ("venue_slug", &query.venue_slug),
                ("cart_value", &query.cart_value),
                ("user_lat", &query.user_lat),
                ("user_lon", &query.user_lon),
            ]
            .into_iter()
            .filter(|(_, value)| present(value).is_none())
            .map(|(name, _)| name)
            .collect();
            return Err(InvalidValue::new(
                "query",
                missing.join(","),
                format!("missing required query parameters: {}", missing.join(", ")),
            )
            .into());
        };

        let cart_value: i64 = cart.parse().map_err(|_| {
            InvalidValue::new("cart_value", cart, "must be a non-negative integer")
        })?;

        let user_lat: f64 = lat
            .parse()
            .map_err(|_| InvalidValue::new("user_lat", lat, "must be a valid latitude"))?;
        validate_range("user_lat", user_lat, -90.0, 90.0)?;

        let user_lon: f64 = lon
            .parse()
            .map_err(|_| InvalidValue::new("user_lon", lon, "must be a valid longitude"))?;
        validate_range("user_lon", user_lon, -180.0, 180.0)?;

        PriceRequest::new(venue_slug, cart_value, Coordinate::new(user_lat, user_lon)?)
    }
}
