pub mod catalog;
pub mod insearchof;
pub mod media;
pub mod profile;
pub mod sell_list;

use axum::Json;
use axum::extract::Multipart;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::shared::MessageResponse;

/// Query parameter carrying the caller's identity on mutating listing
/// operations.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequesterQuery {
    /// Identity of the requesting user.
    pub user_id: String,
}

/// Pull the `file` field out of a multipart upload.
async fn read_image_field(mut multipart: Multipart) -> Result<(String, Vec<u8>), AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(|s| s.to_string());
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?
                        .to_vec(),
                );
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let raw = file_bytes.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let filename = file_name.unwrap_or_else(|| "upload.jpg".to_string());
    Ok((filename, raw))
}

/// Health check.
#[utoipa::path(
    get,
    path = "/api/helloworld",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = MessageResponse)),
)]
pub async fn helloworld() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World"))
}
