use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::listing::ListingResponse;
use crate::models::profile::{
    ContactInfoRequest, ContactInfoResponse, TransactionHistoryResponse, UserItemsResponse,
    validate_contact_info,
};
use crate::models::shared::MessageResponse;
use crate::state::AppState;
use crate::store::listings::{categories_for, listings_by_user};
use crate::store::profiles::{get_profile, upsert_profile};

#[utoipa::path(
    post,
    path = "/api/profile/contact-info",
    tag = "Profile",
    operation_id = "upsertContactInfo",
    summary = "Store or update a user's contact info",
    request_body = ContactInfoRequest,
    responses(
        (status = 200, description = "Contact info stored", body = MessageResponse),
        (status = 422, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(user_id = %payload.user_id))]
pub async fn upload_contact_info(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ContactInfoRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_contact_info(&payload)?;
    upsert_profile(
        &state.db,
        &payload.user_id,
        &payload.location,
        &payload.phone_number,
    )
    .await?;
    Ok(Json(MessageResponse::new(
        "Contact info uploaded successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/profile/contact-info/{user_id}",
    tag = "Profile",
    operation_id = "getContactInfo",
    summary = "Fetch a user's contact info",
    description = "Users without a stored profile read back as empty strings, not as an error.",
    params(("user_id" = String, Path, description = "User ID")),
    responses((status = 200, description = "Contact info", body = ContactInfoResponse)),
)]
#[instrument(skip(state), fields(user_id))]
pub async fn get_contact_info(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ContactInfoResponse>, AppError> {
    let profile = get_profile(&state.db, &user_id).await?;
    Ok(Json(ContactInfoResponse::from_lookup(profile)))
}

#[utoipa::path(
    get,
    path = "/api/profile/items/{user_id}",
    tag = "Profile",
    operation_id = "getListOfItems",
    summary = "All listings owned by a user",
    description = "Returns the user's listings regardless of completion state.",
    params(("user_id" = String, Path, description = "User ID")),
    responses((status = 200, description = "The user's listings", body = UserItemsResponse)),
)]
#[instrument(skip(state), fields(user_id))]
pub async fn get_list_of_items(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserItemsResponse>, AppError> {
    let listings = owned_listing_responses(&state, &user_id).await?;
    Ok(Json(UserItemsResponse { listings }))
}

#[utoipa::path(
    get,
    path = "/api/profile/transaction-history/{user_id}",
    tag = "Profile",
    operation_id = "getTransactionHistory",
    summary = "A user's transaction history",
    description = "The user's listings with their completion state, unfiltered by `trans_comp`, \
        so both open and finalized transactions appear.",
    params(("user_id" = String, Path, description = "User ID")),
    responses((status = 200, description = "Transaction records", body = TransactionHistoryResponse)),
)]
#[instrument(skip(state), fields(user_id))]
pub async fn get_transaction_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<TransactionHistoryResponse>, AppError> {
    let transactions = owned_listing_responses(&state, &user_id).await?;
    Ok(Json(TransactionHistoryResponse { transactions }))
}

async fn owned_listing_responses(
    state: &AppState,
    user_id: &str,
) -> Result<Vec<ListingResponse>, AppError> {
    let rows = listings_by_user(&state.db, user_id).await?;
    let ids: Vec<String> = rows.iter().map(|m| m.id.clone()).collect();
    let mut categories = categories_for(&state.db, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|m| {
            let cats = categories.remove(&m.id).unwrap_or_default();
            ListingResponse::from_parts(m, cats)
        })
        .collect())
}
