//! Listing lifecycle operations: create, update, delete, completion toggle,
//! and ownership checks. Both listing surfaces (sell-list and insearchof)
//! funnel through these, so the ownership and state rules live in one place.

use tradepost_common::storage::BlobStore;

use crate::error::AppError;
use crate::images;
use crate::models::listing::{
    CreateListingRequest, OwnedListingDetails, UpdateListingRequest, ValidateOwnershipResponse,
    validate_create_listing, validate_update_listing,
};
use crate::models::shared::validate_user_id;
use crate::state::AppState;
use crate::store::listings::{
    self, DELETE_DENIED, MARK_DENIED, NewListing, UPDATE_DENIED, find_listing, find_owned_listing,
};

/// Validate and persist a new listing. Returns the store-generated ID.
pub async fn create_listing(state: &AppState, req: CreateListingRequest) -> Result<String, AppError> {
    validate_create_listing(&req)?;

    let kind = req.kind.listing_type();
    let (urgent, availability_dates) = req.kind.column_values();

    listings::insert_listing(
        &state.db,
        NewListing {
            title: req.title,
            description: req.description,
            price: req.price,
            image_url: req.image_url,
            user_id: req.user_id,
            display_name: req.display_name,
            email: req.email,
            kind,
            urgent,
            availability_dates,
            categories: req.categories,
        },
    )
    .await
}

/// Merge an owner's update onto an existing listing.
pub async fn update_listing(
    state: &AppState,
    id: &str,
    patch: UpdateListingRequest,
) -> Result<(), AppError> {
    validate_update_listing(&patch)?;
    let model = find_owned_listing(&state.db, id, &patch.user_id, UPDATE_DENIED).await?;
    listings::update_listing(&state.db, model, patch).await
}

/// Delete a listing and, when it carries an image, the stored blob first.
///
/// The two deletes are not transactional across services; if the row delete
/// fails after the blob is gone the listing survives without its image.
pub async fn delete_listing(state: &AppState, id: &str, user_id: &str) -> Result<(), AppError> {
    let model = find_owned_listing(&state.db, id, user_id, DELETE_DENIED).await?;

    if let Some(ref url) = model.image_url
        && let Some(path) = images::image_path_from_url(&model.user_id, url)
    {
        // Ok(false) means the blob was already gone; that's fine.
        state.blob_store.delete(&path).await?;
    }

    listings::delete_listing_row(&state.db, &model.id).await
}

/// Toggle the transaction-complete flag. Returns the new state.
pub async fn mark_transaction_complete(
    state: &AppState,
    id: &str,
    user_id: &str,
) -> Result<bool, AppError> {
    let model = find_owned_listing(&state.db, id, user_id, MARK_DENIED).await?;
    listings::toggle_trans_comp(&state.db, model).await
}

/// Read-only ownership probe. Owners additionally get a redacted detail
/// projection of their listing.
pub async fn validate_ownership(
    state: &AppState,
    id: &str,
    user_id: &str,
) -> Result<ValidateOwnershipResponse, AppError> {
    let model = find_listing(&state.db, id).await?;
    if model.user_id != user_id {
        return Ok(ValidateOwnershipResponse {
            is_owner: false,
            listing: None,
        });
    }

    let categories = listings::categories_of(&state.db, &model.id).await?;
    Ok(ValidateOwnershipResponse {
        is_owner: true,
        listing: Some(OwnedListingDetails {
            title: model.title,
            description: model.description,
            price: model.price,
            image_url: model.image_url,
            urgent: model.urgent,
            categories,
        }),
    })
}

/// Normalize an uploaded image and store it under the owner's namespace.
/// Returns the public URL of the stored blob.
pub async fn store_listing_image(
    state: &AppState,
    user_id: &str,
    filename: &str,
    raw: Vec<u8>,
) -> Result<String, AppError> {
    validate_user_id(user_id)?;

    let normalized = images::normalize_blocking(raw).await?;
    let path = images::unique_image_path(user_id, filename);
    let url = state
        .blob_store
        .put(&path, &normalized, images::IMAGE_CONTENT_TYPE)
        .await?;
    Ok(url)
}

/// Remove a stored image addressed by filename within the owner's namespace.
pub async fn delete_listing_image(
    state: &AppState,
    user_id: &str,
    filename: &str,
) -> Result<(), AppError> {
    let path = images::image_path(user_id, filename);
    state.blob_store.delete(&path).await?;
    Ok(())
}
