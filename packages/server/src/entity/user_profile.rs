use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    /// External user identity string; supplied by the caller, never generated.
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    /// Pickup location shown to buyers.
    pub location: String,
    pub phone_number: String,
}

impl ActiveModelBehavior for ActiveModel {}
