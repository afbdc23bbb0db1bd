pub mod distance;
pub mod engine;
pub mod fees;
pub mod fetch;
pub mod range;

pub use crate::domain::model::{
    Coordinate, DeliveryFee, DistanceRange, PriceRequest, PriceResult, VenuePricing, VenueStatic,
};
pub use crate::domain::ports::{ConfigProvider, LocationSource, PricingSource};
pub use crate::utils::error::PriceError;
