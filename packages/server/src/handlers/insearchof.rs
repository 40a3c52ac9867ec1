use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::lifecycle;
use crate::models::listing::{
    CreateListingRequest, MarkCompleteResponse, UpdateListingRequest, UploadImageResponse,
    UploadRequestResponse, ValidateOwnershipResponse,
};
use crate::models::shared::MessageResponse;
use crate::state::AppState;

use super::{RequesterQuery, read_image_field};

#[utoipa::path(
    post,
    path = "/api/insearchof/upload",
    tag = "In Search Of",
    operation_id = "uploadRequest",
    summary = "Create a request-type listing",
    description = "Records an item or service a user is searching for. The payload's `type` tag \
        is expected to be `request`.",
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Request created", body = UploadRequestResponse),
        (status = 422, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn upload_request(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateListingRequest>,
) -> Result<Json<UploadRequestResponse>, AppError> {
    let request_id = lifecycle::create_listing(&state, payload).await?;
    Ok(Json(UploadRequestResponse {
        message: "Request uploaded successfully".into(),
        request_id,
    }))
}

#[utoipa::path(
    put,
    path = "/api/insearchof/update/{request_id}",
    tag = "In Search Of",
    operation_id = "updateRequest",
    summary = "Update a request-type listing",
    params(("request_id" = String, Path, description = "Request ID")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Request updated", body = MessageResponse),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Request not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(request_id))]
pub async fn update_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    AppJson(payload): AppJson<UpdateListingRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    lifecycle::update_listing(&state, &request_id, payload).await?;
    Ok(Json(MessageResponse::new("Request updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/insearchof/delete/{request_id}",
    tag = "In Search Of",
    operation_id = "deleteRequest",
    summary = "Delete a request-type listing and its stored image",
    params(
        ("request_id" = String, Path, description = "Request ID"),
        RequesterQuery,
    ),
    responses(
        (status = 200, description = "Request deleted", body = MessageResponse),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Request not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(request_id))]
pub async fn delete_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Query(query): Query<RequesterQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    lifecycle::delete_listing(&state, &request_id, &query.user_id).await?;
    Ok(Json(MessageResponse::new("Request deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/insearchof/mark/{request_id}",
    tag = "In Search Of",
    operation_id = "markRequestComplete",
    summary = "Toggle a request's transaction-complete flag",
    params(
        ("request_id" = String, Path, description = "Request ID"),
        RequesterQuery,
    ),
    responses(
        (status = 200, description = "Flag toggled", body = MarkCompleteResponse),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Request not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(request_id))]
pub async fn mark_transaction_complete(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Query(query): Query<RequesterQuery>,
) -> Result<Json<MarkCompleteResponse>, AppError> {
    let trans_comp =
        lifecycle::mark_transaction_complete(&state, &request_id, &query.user_id).await?;
    Ok(Json(MarkCompleteResponse {
        message: "Transaction status updated".into(),
        trans_comp,
    }))
}

#[utoipa::path(
    get,
    path = "/api/insearchof/validate/{request_id}",
    tag = "In Search Of",
    operation_id = "validateOwnership",
    summary = "Check whether a user owns a listing",
    description = "Never mutates. Owners get a redacted detail projection of their listing; \
        non-owners just get `is_owner: false`.",
    params(
        ("request_id" = String, Path, description = "Request ID"),
        RequesterQuery,
    ),
    responses(
        (status = 200, description = "Ownership result", body = ValidateOwnershipResponse),
        (status = 404, description = "Request not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(request_id))]
pub async fn validate_ownership(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Query(query): Query<RequesterQuery>,
) -> Result<Json<ValidateOwnershipResponse>, AppError> {
    let result = lifecycle::validate_ownership(&state, &request_id, &query.user_id).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/insearchof/upload-image/{user_id}",
    tag = "In Search Of",
    operation_id = "uploadRequestImage",
    summary = "Normalize and store a request image",
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
