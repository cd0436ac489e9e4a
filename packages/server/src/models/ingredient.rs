use serde::{Deserialize, Serialize};

use crate::entity::ingredient;

#[derive(Serialize, utoipa::ToSchema)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<ingredient::Model> for IngredientResponse {
    fn from(model: ingredient::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            measurement_unit: model.measurement_unit,
        }
    }
}

/// Reference data is served unpaginated; the only filter is a name prefix.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct IngredientListQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}
