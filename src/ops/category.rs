use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::warn;

use crate::models::category::{Category, CategorySummary, CreateCategoryReq, UpdateCategoryReq};
use crate::ops::user::user_exists;
use crate::utils::errorhandler::{is_foreign_key_violation, is_unique_violation, AppError};

/// Trims and title-cases a category name the way it is stored: the first
/// letter of every alphabetic run uppercased, the rest lowered.
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut prev_alpha = false;
    for ch in trimmed.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

fn validate_name(raw: &str) -> Result<(), AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_field(
            "Category name is required and cannot be empty",
            "category_name",
        ));
    }
    let len = trimmed.chars().count();
    if len < 2 {
        return Err(AppError::invalid_field(
            "Category name must be at least 2 characters long",
            "category_name",
        ));
    }
    if len > 100 {
        return Err(AppError::invalid_field(
            "Category name cannot exceed 100 characters",
            "category_name",
        ));
    }
    Ok(())
}

async fn name_collides(
    pool: &PgPool,
    normalized: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    match exclude_id {
        Some(id) => {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM categories
                 WHERE LOWER(category_name) = LOWER($1) AND id <> $2)",
            )
            .bind(normalized)
            .bind(id)
            .fetch_one(pool)
            .await
        }
        None => {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE LOWER(category_name) = LOWER($1))",
            )
            .bind(normalized)
            .fetch_one(pool)
            .await
        }
    }
}

pub async fn create_category(
    pool: &PgPool,
    payload: CreateCategoryReq,
    user_id: i64,
) -> Result<Category, AppError> {
    validate_name(&payload.category_name)?;
    if user_id <= 0 {
        return Err(AppError::invalid_field("Valid user ID is required", "user_id"));
    }

    let normalized = normalize_name(&payload.category_name);

    if !user_exists(pool, user_id).await? {
        return Err(AppError::UserNotFound { user_id });
    }

    if name_collides(pool, &normalized, None).await? {
        return Err(AppError::CategoryAlreadyExists {
            category_name: normalized,
        });
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (category_name, color, created_by)
         VALUES ($1, $2, $3)
         RETURNING id, category_name, color, created_by, created_at, modified_at",
    )
    .bind(&normalized)
    .bind(&payload.color)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::CategoryAlreadyExists {
                category_name: normalized.clone(),
            }
        } else if is_foreign_key_violation(&e) {
            AppError::UserNotFound { user_id }
        } else {
            warn!("Database error inserting category: {}", e);
            AppError::Storage(e)
        }
    })?;

    Ok(category)
}

pub async fn get_categories(pool: &PgPool) -> Result<Vec<CategorySummary>, AppError> {
    let categories = sqlx::query_as::<_, CategorySummary>(
        "SELECT c.id,
                c.category_name,
                c.color,
                c.created_by AS user_id,
                COUNT(e.id) AS event_count
         FROM categories AS c
         LEFT JOIN events AS e ON e.category_id = c.id
         GROUP BY c.id
         ORDER BY c.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn get_category_by_id(pool: &PgPool, category_id: i64) -> Result<Category, AppError> {
    if category_id <= 0 {
        return Err(AppError::invalid_field(
            "Valid category ID is required",
            "category_id",
        ));
    }

    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::CategoryNotFound { category_id })
}

/// Applies the supplied fields only; a modification timestamp is always
/// stamped alongside them.
pub async fn update_category(pool: &PgPool, payload: UpdateCategoryReq) -> Result<i64, AppError> {
    if payload.id <= 0 {
        return Err(AppError::invalid_field("Valid category ID is required", "id"));
    }

    let normalized = match &payload.category_name {
        Some(name) => {
            validate_name(name)?;
            let normalized = normalize_name(name);
            if name_collides(pool, &normalized, Some(payload.id)).await? {
                return Err(AppError::CategoryAlreadyExists {
                    category_name: normalized,
                });
            }
            Some(normalized)
        }
        None => None,
    };

    if normalized.is_none() && payload.color.is_none() {
        return Err(AppError::invalid_argument("No fields to update provided"));
    }

    let mut qb = QueryBuilder::<Postgres>::new("UPDATE categories SET ");
    let mut fields = qb.separated(", ");
    if let Some(name) = &normalized {
        fields.push("category_name = ").push_bind_unseparated(name);
    }
    if let Some(color) = &payload.color {
        fields.push("color = ").push_bind_unseparated(color);
    }
    fields.push("modified_at = now()");
    qb.push(" WHERE id = ").push_bind(payload.id);

    let result = qb.build().execute(pool).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::CategoryAlreadyExists {
                category_name: normalized.clone().unwrap_or_default(),
            }
        } else {
            warn!("Database error updating category {}: {}", payload.id, e);
            AppError::Storage(e)
        }
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::CategoryNotFound {
            category_id: payload.id,
        });
    }

    Ok(payload.id)
}

/// Deletion is blocked while any event still references the category.
pub async fn delete_category(pool: &PgPool, category_id: i64) -> Result<(), AppError> {
    if category_id <= 0 {
        return Err(AppError::invalid_field(
            "Valid category ID is required",
            "category_id",
        ));
    }

    let event_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(pool)
            .await?;
    if event_count > 0 {
        return Err(AppError::CategoryHasEvents {
            category_id,
            event_count,
        });
    }

    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(category_id)
        .execute(pool)
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            Err(AppError::CategoryNotFound { category_id })
        }
        Ok(_) => Ok(()),
        // an event was attached between the count and the delete
        Err(e) if is_foreign_key_violation(&e) => {
            let event_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE category_id = $1")
                    .bind(category_id)
                    .fetch_one(pool)
                    .await?;
            Err(AppError::CategoryHasEvents {
                category_id,
                event_count,
            })
        }
        Err(e) => {
            warn!("Database error deleting category {}: {}", category_id, e);
            Err(AppError::Storage(e))
        }
    }
}
