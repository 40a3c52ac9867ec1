use serde::{Deserialize, Serialize};

use crate::entity::user_profile;
use crate::error::AppError;

use super::listing::ListingResponse;
use super::shared::validate_user_id;

/// Contact metadata upsert payload.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ContactInfoRequest {
    pub user_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContactInfoResponse {
    pub location: String,
    pub phone_number: String,
}

impl ContactInfoResponse {
    /// Missing profiles read back as empty contact info, not as an error.
    pub fn from_lookup(profile: Option<user_profile::Model>) -> Self {
        match profile {
            Some(p) => Self {
                location: p.location,
                phone_number: p.phone_number,
            },
            None => Self {
                location: String::new(),
                phone_number: String::new(),
            },
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserItemsResponse {
    pub listings: Vec<ListingResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TransactionHistoryResponse {
    pub transactions: Vec<ListingResponse>,
}

pub fn validate_contact_info(req: &ContactInfoRequest) -> Result<(), AppError> {
    validate_user_id(&req.user_id)
}
