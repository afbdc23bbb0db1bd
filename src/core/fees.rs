use crate::domain::model::{DeliveryFee, DistanceRange, PriceResult};
use crate::utils::error::{FetchError, InvalidValue, PriceError, VenueFeed};

// 2^63, exactly representable as f64.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Difference up to the venue minimum, never negative.
///
/// `None` only when a negative cart value sits so far below the minimum that
/// the difference does not fit in an `i64`.
pub fn small_order_surcharge(order_minimum_no_surcharge: i64, cart_value: i64) -> Option<i64> {
    if cart_value >= order_minimum_no_surcharge {
        return Some(0);
    }
    order_minimum_no_surcharge.checked_sub(cart_value)
}

/// `base_price + a + round(b * distance / 10)`, rounded once at the end.
///
/// `None` when the pricing numbers overflow an `i64`.
pub fn delivery_fee(base_price: i64, range: &DistanceRange, distance: u64) -> Option<i64> {
    let per_distance = (range.b as f64 * distance as f64 / 10.0).round();
    // `as` would saturate silently.
    if !(-I64_LIMIT..I64_LIMIT).contains(&per_distance) {
        return None;
    }
    base_price
        .checked_add(range.a)?
        .checked_add(per_distance as i64)
}

fn pricing_out_of_range(message: &str) -> PriceError {
    PriceError::UpstreamFetchFailed(FetchError::malformed(VenueFeed::Dynamic, message))
}

/// Assembles the final price. Overflow never wraps: a total pushed out of
/// range by the cart value is invalid input, one pushed out by the venue's
/// pricing numbers is a malformed upstream payload.
pub fn compose(
    cart_value: i64,
    order_minimum_no_surcharge: i64,
    base_price: i64,
    range: &DistanceRange,
    distance: u64,
) -> Result<PriceResult, PriceError> {
    let surcharge = small_order_surcharge(order_minimum_no_surcharge, cart_value)
        .ok_or_else(|| InvalidValue::new("cart_value", cart_value, "Value out of range"))?;
    let fee = delivery_fee(base_price, range, distance)
        .ok_or_else(|| pricing_out_of_range("delivery fee out of range"))?;

    let Some(total_price) = cart_value
        .checked_add(surcharge)
        .and_then(|subtotal| subtotal.checked_add(fee))
    else {
        // Blame the larger term.
        return Err(if surcharge == 0 && cart_value >= fee {
            InvalidValue::new("cart_value", cart_value, "total price out of range").into()
        } else {
            pricing_out_of_range("total price out of range")
        });
    };

    Ok(PriceResult {
        total_price,
        small_order_surcharge: surcharge,
        cart_value,
        delivery: DeliveryFee { fee, distance },
    })
}
