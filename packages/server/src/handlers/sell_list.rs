use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::lifecycle;
use crate::models::listing::{
    CreateListingRequest, ListingDetailsResponse, ListingResponse, MarkCompleteResponse,
    UpdateListingRequest, UploadImageResponse, UploadListingResponse, UserListingItem,
};
use crate::models::shared::MessageResponse;
use crate::state::AppState;
use crate::store::listings::{categories_of, find_listing, listings_by_user};

use super::{RequesterQuery, read_image_field};

pub fn image_upload_body_limit(max_upload_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_bytes)
}

#[utoipa::path(
    post,
    path = "/api/sell-list/upload",
    tag = "Sell List",
    operation_id = "uploadListing",
    summary = "Create a sale or rental listing",
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Listing created", body = UploadListingResponse),
        (status = 422, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn upload_listing(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateListingRequest>,
) -> Result<Json<UploadListingResponse>, AppError> {
    let listing_id = lifecycle::create_listing(&state, payload).await?;
    Ok(Json(UploadListingResponse {
        message: "Listing uploaded successfully".into(),
        listing_id,
    }))
}

#[utoipa::path(
    put,
    path = "/api/sell-list/update/{listing_id}",
    tag = "Sell List",
    operation_id = "updateListing",
    summary = "Update an existing listing",
    description = "Merges the provided fields onto the stored listing. Only the owner may update.",
    params(("listing_id" = String, Path, description = "Listing ID")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = MessageResponse),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Listing not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(listing_id))]
pub async fn update_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
    AppJson(payload): AppJson<UpdateListingRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    lifecycle::update_listing(&state, &listing_id, payload).await?;
    Ok(Json(MessageResponse::new("Listing updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/sell-list/delete/{listing_id}",
    tag = "Sell List",
    operation_id = "deleteListing",
    summary = "Delete a listing and its stored image",
    params(
        ("listing_id" = String, Path, description = "Listing ID"),
        RequesterQuery,
    ),
    responses(
        (status = 200, description = "Listing deleted", body = MessageResponse),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Listing not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(listing_id))]
pub async fn delete_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
    Query(query): Query<RequesterQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    lifecycle::delete_listing(&state, &listing_id, &query.user_id).await?;
    Ok(Json(MessageResponse::new("Listing deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/sell-list/mark/{listing_id}",
    tag = "Sell List",
    operation_id = "markListingComplete",
    summary = "Toggle a listing's transaction-complete flag",
    params(
        ("listing_id" = String, Path, description = "Listing ID"),
        RequesterQuery,
    ),
    responses(
        (status = 200, description = "Flag toggled", body = MarkCompleteResponse),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Listing not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(listing_id))]
pub async fn mark_transaction_complete(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
    Query(query): Query<RequesterQuery>,
) -> Result<Json<MarkCompleteResponse>, AppError> {
    let trans_comp =
        lifecycle::mark_transaction_complete(&state, &listing_id, &query.user_id).await?;
    Ok(Json(MarkCompleteResponse {
        message: "Transaction status updated".into(),
        trans_comp,
    }))
}

#[utoipa::path(
    post,
    path = "/api/sell-list/upload-image/{user_id}",
    tag = "Sell List",
    operation_id = "uploadListingImage",
    summary = "Normalize and store a listing image",
    description = "Accepts a multipart `file` field, recompresses it to a bounded JPEG, and \
        returns the public URL of the stored image.",
    params(("user_id" = String, Path, description = "Owning user ID")),
    request_body(content_type = "multipart/form-data", description = "Image file upload"),
    responses(
        (status = 200, description = "Image stored", body = UploadImageResponse),
        (status = 422, description = "Missing or undecodable file (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart), fields(user_id))]
pub async fn upload_image(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<UploadImageResponse>, AppError> {
    let (filename, raw) = read_image_field(multipart).await?;
    let image_url = lifecycle::store_listing_image(&state, &user_id, &filename, raw).await?;
    Ok(Json(UploadImageResponse {
        message: "Image uploaded successfully".into(),
        image_url,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/sell-list/delete-image/{filename}/{user_id}",
    tag = "Sell List",
    operation_id = "deleteListingImage",
    summary = "Delete a stored listing image",
    params(
        ("filename" = String, Path, description = "Stored image filename"),
        ("user_id" = String, Path, description = "Owning user ID"),
    ),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(user_id))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path((filename, user_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    lifecycle::delete_listing_image(&state, &user_id, &filename).await?;
    Ok(Json(MessageResponse::new("Image deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/sell-list/listing-details/{listing_id}",
    tag = "Sell List",
    operation_id = "getListingDetails",
    summary = "Fetch a single listing by ID",
    params(("listing_id" = String, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing details", body = ListingDetailsResponse),
        (status = 404, description = "Listing not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(listing_id))]
pub async fn get_listing_details(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
) -> Result<Json<ListingDetailsResponse>, AppError> {
    let model = find_listing(&state.db, &listing_id).await?;
    let categories = categories_of(&state.db, &model.id).await?;

    Ok(Json(ListingDetailsResponse {
        message: "Listing details fetched successfully".into(),
        listing_details: ListingResponse::from_parts(model, categories),
    }))
}

#[utoipa::path(
    get,
    path = "/api/sell-list/user-listings/{user_id}",
    tag = "Sell List",
    operation_id = "getUserListings",
    summary = "List id/title pairs of a user's listings",
    params(("user_id" = String, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "The user's listings", body = [UserListingItem]),
    ),
)]
#[instrument(skip(state), fields(user_id))]
pub async fn get_user_listings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserListingItem>>, AppError> {
    let items = listings_by_user(&state.db, &user_id)
        .await?
        .into_iter()
        .map(|m| UserListingItem {
            listing_id: m.id,
            title: m.title,
        })
        .collect();
    Ok(Json(items))
}
