use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tradepost_common::ListingType;
use uuid::Uuid;

use crate::entity::{listing, listing_category};
use crate::error::AppError;
use crate::models::catalog::{CatalogFilters, SortKey};
use crate::models::listing::{UpdateListingRequest, normalize_categories};

pub const UPDATE_DENIED: &str = "Unauthorized to update this listing.";
pub const DELETE_DENIED: &str = "Unauthorized to delete this listing.";
pub const MARK_DENIED: &str = "Unauthorized to modify this listing.";
const LISTING_NOT_FOUND: &str = "Listing not found";

/// Validated input for a new listing row. The caller has already run the
/// boundary validation; this type carries only what gets persisted.
pub struct NewListing {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub kind: ListingType,
    pub urgent: bool,
    pub availability_dates: Option<String>,
    pub categories: Vec<String>,
}

/// Find a listing by ID or return 404.
pub async fn find_listing<C: ConnectionTrait>(db: &C, id: &str) -> Result<listing::Model, AppError> {
    listing::Entity::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(LISTING_NOT_FOUND.into()))
}

/// Find a listing and check the requester against its owner.
///
/// Existence is checked before ownership, so a nonexistent ID is always 404
/// and never leaks through as 403.
pub async fn find_owned_listing<C: ConnectionTrait>(
    db: &C,
    id: &str,
    user_id: &str,
    denied_detail: &str,
) -> Result<listing::Model, AppError> {
    let model = find_listing(db, id).await?;
    if model.user_id != user_id {
        return Err(AppError::PermissionDenied(denied_detail.into()));
    }
    Ok(model)
}

/// Insert a listing row plus its category memberships, stamping the
/// store-generated ID and creation time.
pub async fn insert_listing(db: &DatabaseConnection, new: NewListing) -> Result<String, AppError> {
    let id = Uuid::now_v7().to_string();

    let row = listing::ActiveModel {
        id: Set(id.clone()),
        title: Set(new.title.trim().to_string()),
        description: Set(new.description),
        price: Set(new.price),
        image_url: Set(none_if_empty(new.image_url)),
        user_id: Set(new.user_id),
        display_name: Set(new.display_name),
        email: Set(new.email),
        kind: Set(new.kind),
        trans_comp: Set(false),
        urgent: Set(new.urgent),
        availability_dates: Set(none_if_empty(new.availability_dates)),
        timestamp: Set(Utc::now()),
        ..Default::default()
    };

    let txn = db.begin().await?;
    listing::Entity::insert(row)
        .exec_without_returning(&txn)
        .await?;
    insert_categories(&txn, &id, &normalize_categories(&new.categories)).await?;
    txn.commit().await?;

    Ok(id)
}

/// Merge the provided fields of `patch` onto `model` and persist. The
/// category list is replaced wholesale only when the patch carries one.
pub async fn update_listing(
    db: &DatabaseConnection,
    model: listing::Model,
    patch: UpdateListingRequest,
) -> Result<(), AppError> {
    let listing_id = model.id.clone();

    let mut row: listing::ActiveModel = model.into();
    if let Some(title) = patch.title {
        row.title = Set(title.trim().to_string());
    }
    if let Some(description) = patch.description {
        row.description = Set(Some(description));
    }
    if let Some(price) = patch.price {
        row.price = Set(price);
    }
    if let Some(image_url) = patch.image_url {
        row.image_url = Set(none_if_empty(Some(image_url)));
    }
    if let Some(display_name) = patch.display_name {
        row.display_name = Set(display_name);
    }
    if let Some(email) = patch.email {
        row.email = Set(email);
    }
    if let Some(kind) = patch.kind {
        row.kind = Set(kind);
    }
    if let Some(urgent) = patch.urgent {
        row.urgent = Set(urgent);
    }
    if let Some(availability_dates) = patch.availability_dates {
        row.availability_dates = Set(none_if_empty(Some(availability_dates)));
    }

    let row_changed = row.is_changed();
    if !row_changed && patch.categories.is_none() {
        return Ok(());
    }

    let txn = db.begin().await?;
    if row_changed {
        row.update(&txn).await?;
    }
    if let Some(categories) = patch.categories {
        listing_category::Entity::delete_many()
            .filter(listing_category::Column::ListingId.eq(&listing_id))
            .exec(&txn)
            .await?;
        insert_categories(&txn, &listing_id, &normalize_categories(&categories)).await?;
    }
    txn.commit().await?;

    Ok(())
}

/// Flip the transaction-complete flag and persist. Returns the new state.
pub async fn toggle_trans_comp<C: ConnectionTrait>(
    db: &C,
    model: listing::Model,
) -> Result<bool, AppError> {
    let new_state = !model.trans_comp;
    let mut row: listing::ActiveModel = model.into();
    row.trans_comp = Set(new_state);
    row.update(db).await?;
    Ok(new_state)
}

/// Delete a listing row and its category memberships.
pub async fn delete_listing_row(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
    let txn = db.begin().await?;
    listing_category::Entity::delete_many()
        .filter(listing_category::Column::ListingId.eq(id))
        .exec(&txn)
        .await?;
    listing::Entity::delete_by_id(id.to_owned()).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Category labels of a single listing.
pub async fn categories_of<C: ConnectionTrait>(
    db: &C,
    listing_id: &str,
) -> Result<Vec<String>, AppError> {
    Ok(listing_category::Entity::find()
        .filter(listing_category::Column::ListingId.eq(listing_id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.category)
        .collect())
}

/// Category labels for a batch of listings, grouped by listing ID.
pub async fn categories_for<C: ConnectionTrait>(
    db: &C,
    listing_ids: &[String],
) -> Result<HashMap<String, Vec<String>>, AppError> {
    if listing_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = listing_category::Entity::find()
        .filter(listing_category::Column::ListingId.is_in(listing_ids.iter().cloned()))
        .all(db)
        .await?;

    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        grouped.entry(row.listing_id).or_default().push(row.category);
    }
    Ok(grouped)
}

fn sort_order(sort: SortKey) -> (listing::Column, Order) {
    match sort {
        SortKey::UploadDateAsc => (listing::Column::Timestamp, Order::Asc),
        SortKey::UploadDateDesc => (listing::Column::Timestamp, Order::Desc),
        SortKey::PriceAsc => (listing::Column::Price, Order::Asc),
        SortKey::PriceDesc => (listing::Column::Price, Order::Desc),
    }
}

/// Build the store-level catalog query: kind membership, price range, and an
/// any-overlap subquery against the membership table when a category filter
/// is active. Ordering is applied at the store.
pub fn catalog_select(filters: &CatalogFilters) -> Select<listing::Entity> {
    let mut select = listing::Entity::find()
        .filter(listing::Column::Kind.is_in(filters.types.iter().copied()))
        .filter(listing::Column::Price.gte(filters.min_price));

    if filters.max_price.is_finite() {
        select = select.filter(listing::Column::Price.lte(filters.max_price));
    }

    if let Some(ref categories) = filters.categories {
        select = select.filter(
            listing::Column::Id.in_subquery(
                SeaQuery::select()
                    .column(listing_category::Column::ListingId)
                    .from(listing_category::Entity)
                    .and_where(listing_category::Column::Category.is_in(categories.clone()))
                    .to_owned(),
            ),
        );
    }

    let (column, order) = sort_order(filters.sort);
    select.order_by(column, order)
}

/// All listings owned by a user, newest first, regardless of completion
/// state.
pub async fn listings_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> Result<Vec<listing::Model>, AppError> {
    Ok(listing::Entity::find()
        .filter(listing::Column::UserId.eq(user_id))
        .order_by_desc(listing::Column::Timestamp)
        .all(db)
        .await?)
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
