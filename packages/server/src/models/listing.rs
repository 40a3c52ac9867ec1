use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tradepost_common::ListingType;

use crate::entity::listing;
use crate::error::AppError;

use super::shared::{validate_price, validate_title, validate_user_id};

/// Kind-conditional listing fields as a tagged sum over the listing type.
///
/// The `type` tag discriminates the variant on the wire; each variant
/// enumerates exactly the fields that are meaningful for that kind, so a
/// `buy` listing cannot smuggle rental dates and a `rent` listing cannot be
/// urgent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ListingKindFields {
    Buy,
    Rent {
        /// Free-text availability range, e.g. "7/8/2024 to 7/15/2024".
        #[serde(default)]
        availability_dates: Option<String>,
    },
    Request {
        /// Whether the requester needs the item urgently.
        #[serde(default)]
        urgent: bool,
    },
}

impl ListingKindFields {
    pub fn listing_type(&self) -> ListingType {
        match self {
            Self::Buy => ListingType::Buy,
            Self::Rent { .. } => ListingType::Rent,
            Self::Request { .. } => ListingType::Request,
        }
    }

    /// Flattened column values (urgent, availability_dates).
    pub fn column_values(&self) -> (bool, Option<String>) {
        match self {
            Self::Buy => (false, None),
            Self::Rent { availability_dates } => (false, availability_dates.clone()),
            Self::Request { urgent } => (*urgent, None),
        }
    }

    pub fn from_columns(
        kind: ListingType,
        urgent: bool,
        availability_dates: Option<String>,
    ) -> Self {
        match kind {
            ListingType::Buy => Self::Buy,
            ListingType::Rent => Self::Rent { availability_dates },
            ListingType::Request => Self::Request { urgent },
        }
    }
}

/// Payload for creating a listing on either the sell-list or insearchof
/// surface.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateListingRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub display_name: String,
    pub email: String,
    /// Identity of the creating user; empty means unauthenticated.
    pub user_id: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(flatten)]
    pub kind: ListingKindFields,
}

/// Partial update. Absent fields keep their stored values; the category list
/// is replaced wholesale only when provided.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateListingRequest {
    /// Identity of the requesting user; must match the listing owner.
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default, rename = "type")]
    pub kind: Option<ListingType>,
    #[serde(default)]
    pub urgent: Option<bool>,
    #[serde(default)]
    pub availability_dates: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadListingResponse {
    pub message: String,
    pub listing_id: String,
}

/// The insearchof surface historically calls the id `request_id`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadRequestResponse {
    pub message: String,
    pub request_id: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MarkCompleteResponse {
    pub message: String,
    /// The listing's transaction-complete flag after the toggle.
    pub trans_comp: bool,
}

/// Full listing projection returned by detail and profile reads.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ListingResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub trans_comp: bool,
    pub categories: Vec<String>,
    #[serde(flatten)]
    pub kind: ListingKindFields,
    pub timestamp: DateTime<Utc>,
}

impl ListingResponse {
    pub fn from_parts(model: listing::Model, categories: Vec<String>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            price: model.price,
            image_url: model.image_url,
            user_id: model.user_id,
            display_name: model.display_name,
            email: model.email,
            trans_comp: model.trans_comp,
            categories,
            kind: ListingKindFields::from_columns(
                model.kind,
                model.urgent,
                model.availability_dates,
            ),
            timestamp: model.timestamp,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ListingDetailsResponse {
    pub message: String,
    #[serde(rename = "listingDetails")]
    pub listing_details: ListingResponse,
}

/// Redacted projection shown to a verified owner.
#[derive(Serialize, utoipa::ToSchema)]
pub struct OwnedListingDetails {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub urgent: bool,
    pub categories: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidateOwnershipResponse {
    pub is_owner: bool,
    /// Present only when `is_owner` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<OwnedListingDetails>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListingItem {
    pub listing_id: String,
    pub title: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadImageResponse {
    pub message: String,
    pub image_url: String,
}

pub fn validate_create_listing(req: &CreateListingRequest) -> Result<(), AppError> {
    validate_user_id(&req.user_id)?;
    validate_title(&req.title)?;
    validate_price(req.price)?;
    Ok(())
}

pub fn validate_update_listing(req: &UpdateListingRequest) -> Result<(), AppError> {
    validate_user_id(&req.user_id)?;
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    Ok(())
}

/// Normalizes a category list: trims entries, drops empties and duplicates,
/// preserving first-seen order.
pub fn normalize_categories(categories: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    categories
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.to_string()))
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_parses_tagged_kind() {
        let req: CreateListingRequest = serde_json::from_value(json!({
            "title": "iPhone 10 (Used)",
            "price": 120.0,
            "display_name": "testuser",
            "email": "testemail@gmail.com",
            "user_id": "testuserid",
            "type": "rent",
            "availability_dates": "7/8/2024 to 7/15/2024"
        }))
        .unwrap();

        assert_eq!(
            req.kind,
            ListingKindFields::Rent {
                availability_dates: Some("7/8/2024 to 7/15/2024".into())
            }
        );
        assert_eq!(req.kind.listing_type(), ListingType::Rent);
    }

    #[test]
    fn create_request_buy_needs_no_extra_fields() {
        let req: CreateListingRequest = serde_json::from_value(json!({
            "title": "Vintage Camera",
            "description": "A fully functional vintage camera.",
            "price": 120.0,
            "display_name": "testuser",
            "email": "testemail@gmail.com",
            "user_id": "testuserid",
            "categories": ["Electronics"],
            "type": "buy"
        }))
        .unwrap();

        assert_eq!(req.kind, ListingKindFields::Buy);
        assert_eq!(req.categories, vec!["Electronics"]);
    }

    #[test]
    fn create_request_urgent_request() {
        let req: CreateListingRequest = serde_json::from_value(json!({
            "title": "Microwave",
            "price": 25.0,
            "display_name": "t",
            "email": "t@e.com",
            "user_id": "u",
            "type": "request",
            "urgent": true
        }))
        .unwrap();

        assert_eq!(req.kind, ListingKindFields::Request { urgent: true });
    }

    #[test]
    fn create_request_rejects_unknown_type() {
        let result = serde_json::from_value::<CreateListingRequest>(json!({
            "title": "x",
            "price": 1.0,
            "display_name": "t",
            "email": "t@e.com",
            "user_id": "u",
            "type": "auction"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn listing_response_flattens_kind() {
        let response = ListingResponse {
            id: "id1".into(),
            title: "Microwave".into(),
            description: None,
            price: 25.0,
            image_url: None,
            user_id: "u".into(),
            display_name: "t".into(),
            email: "t@e.com".into(),
            trans_comp: false,
            categories: vec![],
            kind: ListingKindFields::Request { urgent: true },
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "request");
        assert_eq!(value["urgent"], true);
    }

    #[test]
    fn validate_create_listing_checks_identity_first() {
        let req: CreateListingRequest = serde_json::from_value(json!({
            "title": "",
            "price": -1.0,
            "display_name": "t",
            "email": "t@e.com",
            "user_id": "",
            "type": "buy"
        }))
        .unwrap();
        let err = validate_create_listing(&req).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref d) if d.contains("authenticated")));
    }

    #[test]
    fn normalize_categories_trims_and_dedups() {
        let cats = vec![
            " Electronics ".to_string(),
            "".to_string(),
            "Electronics".to_string(),
            "Books".to_string(),
        ];
        assert_eq!(normalize_categories(&cats), vec!["Electronics", "Books"]);
    }
}
