use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::catalog::{
    CatalogFilters, CatalogListingItem, CatalogQuery, ListingsResponse, PurchaseContactResponse,
    PurchaseQuery, matches_search,
};
use crate::models::listing::ListingResponse;
use crate::models::profile::ContactInfoResponse;
use crate::state::AppState;
use crate::store::listings::{catalog_select, categories_for, find_listing};
use crate::store::profiles::get_profile;
use crate::utils::age::time_since;

#[utoipa::path(
    get,
    path = "/api/catalog/listings",
    tag = "Catalog",
    operation_id = "getListings",
    summary = "Filtered, sorted catalog read",
    description = "Returns all listings matching the filters, ordered by the requested sort key. \
        Free-text search is applied as a case-insensitive substring match over title and \
        description; listings with a completed transaction are excluded.",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Matching listings (possibly empty)", body = ListingsResponse),
        (status = 400, description = "Malformed filter parameter (INVALID_ARGUMENT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn get_listings(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ListingsResponse>, AppError> {
    let filters = CatalogFilters::resolve(&query)?;

    let rows = catalog_select(&filters).all(&state.db).await?;

    let ids: Vec<String> = rows.iter().map(|m| m.id.clone()).collect();
    let mut categories = categories_for(&state.db, &ids).await?;

    let now = Utc::now();
    let listings = rows
        .into_iter()
        .filter(|m| {
            filters.search.is_empty()
                || matches_search(&m.title, m.description.as_deref(), &filters.search)
        })
        .filter(|m| !m.trans_comp)
        .map(|m| {
            let cats = categories.remove(&m.id).unwrap_or_default();
            CatalogListingItem {
                time_since_listing: time_since(m.timestamp, now),
                listing: ListingResponse::from_parts(m, cats),
            }
        })
        .collect();

    Ok(Json(ListingsResponse { listings }))
}

#[utoipa::path(
    get,
    path = "/api/catalog/purchase",
    tag = "Catalog",
    operation_id = "purchaseContact",
    summary = "Seller contact handoff",
    description = "Resolves the seller of a listing and returns their contact info so the buyer \
        can arrange the purchase. Contact fields are empty strings when the seller has no \
        stored profile.",
    params(PurchaseQuery),
    responses(
        (status = 200, description = "Seller contact info", body = PurchaseContactResponse),
        (status = 404, description = "Listing not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn purchase_contact(
    State(state): State<AppState>,
    Query(query): Query<PurchaseQuery>,
) -> Result<Json<PurchaseContactResponse>, AppError> {
    let model = find_listing(&state.db, &query.listing_id).await?;
    let contact = ContactInfoResponse::from_lookup(get_profile(&state.db, &model.user_id).await?);

    Ok(Json(PurchaseContactResponse {
        display_name: model.display_name,
        email: model.email,
        location: contact.location,
        phone_number: contact.phone_number,
    }))
}
