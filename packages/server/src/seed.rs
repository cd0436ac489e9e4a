use std::path::Path;

use sea_orm::*;
use serde::Deserialize;
use tracing::info;

use crate::entity::ingredient;

#[derive(Deserialize)]
struct IngredientSeed {
    name: String,
    measurement_unit: String,
}

/// Load the ingredient reference table from a JSON fixture.
///
/// Rows whose name already exists are skipped, so re-running on startup
/// is safe.
pub async fn seed_ingredients(db: &DatabaseConnection, path: &Path) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path).await?;
    let rows: Vec<IngredientSeed> = serde_json::from_str(&raw)?;

    let mut inserted = 0u32;
    for row in rows {
        let model = ingredient::ActiveModel {
            name: Set(row.name),
            measurement_unit: Set(row.measurement_unit),
            ..Default::default()
        };

        let result = ingredient::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(ingredient::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new ingredients from {}", inserted, path.display());
    }

    Ok(())
}
