use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join row tying one ingredient (with a quantity) to one recipe.
///
/// Rows are owned by their recipe: updates replace the whole set inside one
/// transaction rather than merging.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_ingredient")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub recipe_id: i32,
    #[sea_orm(primary_key)]
    pub ingredient_id: i32,
    #[sea_orm(belongs_to, from = "recipe_id", to = "id")]
    pub recipe: HasOne<super::recipe::Entity>,
    #[sea_orm(belongs_to, from = "ingredient_id", to = "id")]
    pub ingredient: HasOne<super::ingredient::Entity>,

    /// Quantity in the ingredient's measurement unit, always >= 1.
    pub amount: i32,
}

impl ActiveModelBehavior for ActiveModel {}
