use serde::Serialize;

use crate::error::AppError;

/// Plain confirmation payload for mutations that return no data.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a listing price: finite, non-negative, at most 2 fractional digits.
pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() {
        return Err(AppError::Validation("Price must be a finite number".into()));
    }
    if price < 0.0 {
        return Err(AppError::Validation("Price must be non-negative".into()));
    }
    let cents = price * 100.0;
    if (cents - cents.round()).abs() > 1e-6 {
        return Err(AppError::Validation(
            "Price must have at most 2 decimal places".into(),
        ));
    }
    Ok(())
}

/// Validate the caller-supplied user identity. An empty identity means the
/// request arrived without an authenticated user behind it.
pub fn validate_user_id(user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("User must be authenticated".into()));
    }
    Ok(())
}
