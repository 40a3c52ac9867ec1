use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub listing_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub category: String,

    #[sea_orm(belongs_to, from = "listing_id", to = "id")]
    pub listing: Option<super::listing::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
