use crate::utils::error::{InvalidValue, Result};
use url::Url;

pub type FieldResult<T> = std::result::Result<T, InvalidValue>;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> FieldResult<()> {
    if url_str.is_empty() {
        return Err(InvalidValue::new(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(InvalidValue::new(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(InvalidValue::new(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> FieldResult<()> {
    if value < min_value {
        return Err(InvalidValue::new(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> FieldResult<()> {
    if value.trim().is_empty() {
        return Err(InvalidValue::new(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Inclusive range check. NaN never passes.
pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> FieldResult<()> {
    if !(value >= min && value <= max) {
        return Err(InvalidValue::new(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
