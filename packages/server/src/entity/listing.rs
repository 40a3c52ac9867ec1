use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tradepost_common::ListingType;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing")]
pub struct Model {
    /// Store-generated UUIDv7 in canonical string form.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    /// Public blob URL of the listing image, if one was uploaded.
    pub image_url: Option<String>,

    /// Owning user identifier. Immutable for the listing's lifetime.
    pub user_id: String,
    /// Denormalized owner contact snapshot.
    pub display_name: String,
    pub email: String,

    #[sea_orm(column_name = "type")]
    pub kind: ListingType,
    /// True once a transaction tied to the listing has been finalized.
    pub trans_comp: bool,
    /// Meaningful for `request` listings.
    pub urgent: bool,
    /// Free-text date range; meaningful for `rent` listings.
    pub availability_dates: Option<String>,

    #[sea_orm(has_many)]
    pub categories: HasMany<super::listing_category::Entity>,

    /// Creation time, stamped server-side.
    pub timestamp: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
