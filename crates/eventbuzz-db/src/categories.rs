//! Database operations for the `categories` table.

use eventbuzz_core::Category;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub color_hex: String,
    pub icon: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            color_hex: row.color_hex,
            icon: row.icon,
        }
    }
}

/// Returns every category, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRow>, DbError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, slug, color_hex, icon \
         FROM categories \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_into_domain_category() {
        let row = CategoryRow {
            id: 3,
            name: "Food & Drink".to_string(),
            slug: "food-drink".to_string(),
            color_hex: "#FF9800".to_string(),
            icon: "restaurant".to_string(),
        };

        let category = Category::from(row);
        assert_eq!(category.id, 3);
        assert_eq!(category.slug, "food-drink");
        assert_eq!(category.icon, "restaurant");
    }
}
