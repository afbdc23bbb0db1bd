//! Normalizes upstream venue payloads into the engine's plain records.
//!
//! Fields are looked up by presence, never by zero-value: a venue sitting at
//! (0, 0) with no minimum order is valid, a payload without a location is not.

use crate::domain::model::{Coordinate, DistanceRange, VenuePricing, VenueStatic};
use crate::utils::error::{FetchError, VenueFeed};
use serde_json::Value;

fn venue_raw(feed: VenueFeed, payload: &Value) -> Result<&Value, FetchError> {
    payload
        .get("venue_raw")
        .filter(|v| v.is_object())
        .ok_or_else(|| FetchError::malformed(feed, "missing venue_raw"))
}

fn as_f64(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// Integer fields may arrive as floats; those truncate toward zero.
fn as_i64(value: Option<&Value>) -> Option<i64> {
    let value = value?;
    value
        .as_i64()
        .or_else(|| value.as_u64().and_then(|v| i64::try_from(v).ok()))
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}

fn as_u64(value: Option<&Value>) -> Option<u64> {
    as_i64(value).and_then(|v| u64::try_from(v).ok())
}

/// Reads `location` in any of its three shapes, returning `(lat, lon)`.
fn location(location: &Value) -> Option<(f64, f64)> {
    match location.get("coordinates") {
        Some(Value::Object(coords)) => {
            Some((as_f64(coords.get("lat"))?, as_f64(coords.get("lon"))?))
        }
        // GeoJSON order
        Some(Value::Array(coords)) if coords.len() >= 2 => {
            Some((as_f64(coords.get(1))?, as_f64(coords.first())?))
        }
        Some(_) => None,
        None => Some((as_f64(location.get("lat"))?, as_f64(location.get("lon"))?)),
    }
}

pub fn parse_static(payload: &Value) -> Result<VenueStatic, FetchError> {
    let feed = VenueFeed::Static;
    let venue = venue_raw(feed, payload)?;

    let (lat, lon) = venue
        .get("location")
        .and_then(location)
        .ok_or_else(|| FetchError::malformed(feed, "missing venue location"))?;
    let location = Coordinate::new(lat, lon)
        .map_err(|e| FetchError::malformed(feed, format!("venue location out of range: {}", e)))?;

    let order_minimum_no_surcharge = as_i64(
        venue
            .get("delivery_specs")
            .and_then(|specs| specs.get("order_minimum_no_surcharge")),
    )
    .ok_or_else(|| FetchError::malformed(feed, "missing order_minimum_no_surcharge"))?;

    Ok(VenueStatic {
        location,
        order_minimum_no_surcharge,
    })
}

fn distance_range(index: usize, raw: &Value) -> Result<DistanceRange, FetchError> {
    let field = |name: &str| {
        raw.get(name).ok_or_else(|| {
            FetchError::malformed(
                VenueFeed::Dynamic,
                format!("distance_ranges[{}] missing {}", index, name),
            )
        })
    };
    let invalid = |name: &str| {
        FetchError::malformed(
            VenueFeed::Dynamic,
            format!("distance_ranges[{}].{} is not a valid number", index, name),
        )
    };

    Ok(DistanceRange {
        min: as_u64(Some(field("min")?)).ok_or_else(|| invalid("min"))?,
        max: as_u64(Some(field("max")?)).ok_or_else(|| invalid("max"))?,
        a: as_i64(Some(field("a")?)).ok_or_else(|| invalid("a"))?,
        b: as_i64(Some(field("b")?)).ok_or_else(|| invalid("b"))?,
    })
}

pub fn parse_pricing(payload: &Value) -> Result<VenuePricing, FetchError> {
    let feed = VenueFeed::Dynamic;
    let pricing = venue_raw(feed, payload)?
        .get("delivery_specs")
        .and_then(|specs| specs.get("delivery_pricing"))
        .ok_or_else(|| FetchError::malformed(feed, "missing delivery_pricing"))?;

    let base_price = as_i64(pricing.get("base_price"))
        .ok_or_else(|| FetchError::malformed(feed, "missing base_price"))?;

    let distance_ranges = pricing
        .get("distance_ranges")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::malformed(feed, "missing distance_ranges"))?
        .iter()
        .enumerate()
        .map(|(index, raw)| distance_range(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VenuePricing {
        base_price,
        distance_ranges,
    })
}
