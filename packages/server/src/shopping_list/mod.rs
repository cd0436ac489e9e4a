//! Shopping-list aggregation and export.
//!
//! Collects every recipe in a user's cart, folds the ingredient quantities
//! into one total per ingredient identity, and renders the result as plain
//! text or as a paginated PDF. Read-only with respect to stored state.

pub mod pdf;
pub mod text;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::{ingredient, recipe, recipe_ingredient, shopping_cart, user};
use crate::error::AppError;

/// Output format of the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Txt,
    Pdf,
}

impl Format {
    /// Parse the `file_type` query value; anything unrecognized is a
    /// validation error. Absent means `txt`.
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("txt") => Ok(Format::Txt),
            Some("pdf") => Ok(Format::Pdf),
            Some(other) => Err(AppError::Validation(format!(
                "file_type must be 'txt' or 'pdf', got '{other}'"
            ))),
        }
    }
}

/// One ingredient quantity inside a single recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// One recipe section of the document.
#[derive(Debug, Clone)]
pub struct RecipeSection {
    /// Author display name ("first last", or the username fallback).
    pub author: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientLine>,
}

/// One consolidated line of the purchase list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientTotal {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Everything the renderers need, fully resolved.
#[derive(Debug, Clone)]
pub struct ShoppingList {
    pub generated_at: DateTime<Utc>,
    pub recipes: Vec<RecipeSection>,
    pub totals: Vec<IngredientTotal>,
}

/// Sum quantities by ingredient identity (name + measurement unit).
///
/// Totals are ordered ascending by name (byte-order, i.e. `Ord` on `String`),
/// then by unit for the degenerate case of one name with two units.
pub fn aggregate<'a, I>(lines: I) -> Vec<IngredientTotal>
where
    I: IntoIterator<Item = &'a IngredientLine>,
{
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((line.name.clone(), line.measurement_unit.clone()))
            .or_insert(0) += i64::from(line.amount);
    }
    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| IngredientTotal {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

/// Resolve a user's cart into a [`ShoppingList`].
///
/// Fails with [`AppError::EmptyCart`] when the cart has no entries. A join
/// row pointing at a missing recipe or ingredient is a data-integrity error
/// (cascades should make it impossible) and is never silently skipped.
pub async fn collect(db: &DatabaseConnection, user_id: i32) -> Result<ShoppingList, AppError> {
    let cart_rows = shopping_cart::Entity::find()
        .filter(shopping_cart::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    if cart_rows.is_empty() {
        return Err(AppError::EmptyCart);
    }
    let recipe_ids: Vec<i32> = cart_rows.iter().map(|row| row.recipe_id).collect();

    let recipes_with_authors = recipe::Entity::find()
        .filter(recipe::Column::Id.is_in(recipe_ids.clone()))
        .order_by_asc(recipe::Column::Id)
        .find_also_related(user::Entity)
        .all(db)
        .await?;

    let joined = recipe_ingredient::Entity::find()
        .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids))
        .find_also_related(ingredient::Entity)
        .all(db)
        .await?;

    let mut lines_by_recipe: HashMap<i32, Vec<IngredientLine>> = HashMap::new();
    for (row, ing) in joined {
        let ing = ing.ok_or_else(|| {
            AppError::Internal(format!(
                "recipe_ingredient ({}, {}) references a missing ingredient",
                row.recipe_id, row.ingredient_id
            ))
        })?;
        lines_by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(IngredientLine {
                name: ing.name,
                measurement_unit: ing.measurement_unit,
                amount: row.amount,
            });
    }

    let mut sections = Vec::with_capacity(recipes_with_authors.len());
    for (model, author) in recipes_with_authors {
        let author = author.ok_or_else(|| {
            AppError::Internal(format!("recipe {} references a missing author", model.id))
        })?;
        sections.push(RecipeSection {
            author: author.display_name(),
            name: model.name,
            text: model.text,
            cooking_time: model.cooking_time,
            ingredients: lines_by_recipe.remove(&model.id).unwrap_or_default(),
        });
    }

    let totals = aggregate(sections.iter().flat_map(|s| s.ingredients.iter()));

    Ok(ShoppingList {
        generated_at: Utc::now(),
        recipes: sections,
        totals,
    })
}

/// Flatten a [`ShoppingList`] into the logical lines both renderers share.
/// The PDF layer breaks pages purely on line count, so section boundaries
/// carry no meaning here.
pub(crate) fn document_lines(list: &ShoppingList) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Shopping cart (generated: {}):",
        list.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(String::new());
    for section in &list.recipes {
        lines.push(format!("Author: {}", section.author));
        lines.push(format!("Recipe: {}", section.name));
        lines.push(format!("Text: {}", section.text));
        lines.push(format!("Cooking time: {} min.", section.cooking_time));
        lines.push("Ingredients:".to_string());
        for line in &section.ingredients {
            lines.push(format!(
                "- {} - {} {}",
                line.name, line.amount, line.measurement_unit
            ));
        }
        lines.push(String::new());
    }
    lines.push(format!("Total recipes in cart: {}", list.recipes.len()));
    lines.push(String::new());
    lines.push("Ingredients to buy:".to_string());
    for total in &list.totals {
        lines.push(format!(
            "- {} - {} {}",
            total.name, total.total_amount, total.measurement_unit
        ));
    }
    lines
}
