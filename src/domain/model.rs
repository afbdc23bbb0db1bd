use crate::utils::error::{InvalidValue, PriceError};
use crate::utils::validation::{validate_non_empty_string, validate_range};
use serde::{Deserialize, Serialize};

/// A point on the globe in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidValue> {
        validate_range("lat", lat, -90.0, 90.0)?;
        validate_range("lon", lon, -180.0, 180.0)?;
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// What the static venue endpoint tells us.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueStatic {
    pub location: Coordinate,
    /// Cart values below this (minor units) pay the difference as a surcharge.
    pub order_minimum_no_surcharge: i64,
}

/// Pricing tier over the half-open interval `[min, max)` in meters.
///
/// `max == 0` marks a cutoff: delivery is unavailable from `min` onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceRange {
    pub min: u64,
    pub max: u64,
    /// Flat addend.
    pub a: i64,
    /// Multiplier per 10 meters.
    pub b: i64,
}

impl DistanceRange {
    pub fn is_cutoff(&self) -> bool {
        self.max == 0
    }

    pub fn contains(&self, distance: u64) -> bool {
        self.min <= distance && distance < self.max
    }
}

/// What the dynamic venue endpoint tells us. Range order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenuePricing {
    pub base_price: i64,
    pub distance_ranges: Vec<DistanceRange>,
}

/// A validated price request.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRequest {
    venue_slug: String,
    cart_value: i64,
    user_location: Coordinate,
}

impl PriceRequest {
    pub fn new(
        venue_slug: impl Into<String>,
        cart_value: i64,
        user_location: Coordinate,
    ) -> Result<Self, PriceError> {
        let venue_slug = venue_slug.into();
        validate_non_empty_string("venue_slug", &venue_slug)?;
        if cart_value < 0 {
            return Err(
                InvalidValue::new("cart_value", cart_value, "must be a non-negative integer")
                    .into(),
            );
        }
        Ok(Self {
            venue_slug,
            cart_value,
            user_location,
        })
    }

    pub fn venue_slug(&self) -> &str {
        &self.venue_slug
    }

    pub fn cart_value(&self) -> i64 {
        self.cart_value
    }

    pub fn user_location(&self) -> Coordinate {
        self.user_location
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFee {
    pub fee: i64,
    pub distance: u64,
}

/// Successful price breakdown. Serializes to the public response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResult {
    pub total_price: i64,
    pub small_order_surcharge: i64,
    pub cart_value: i64,
    pub delivery: DeliveryFee,
}
