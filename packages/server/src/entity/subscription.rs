use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Follower relation between two users. `user_id` follows `author_id`.
/// Self-reference is rejected at the handler boundary before insert.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub user_id: i32,
    #[sea_orm(primary_key)]
    pub author_id: i32,
    // Only the author side is navigated; a second relation to the same
    // entity would make `find_also_related` ambiguous.
    #[sea_orm(belongs_to, from = "author_id", to = "id")]
    pub author: HasOne<super::user::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
