use crate::catalog::repo_types::{Category, Product, SubCategory};
use sqlx::PgPool;
use uuid::Uuid;

impl Category {
    pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(db)
            .await?;
        Ok(count)
    }

    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            ORDER BY created_at ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, name: &str) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// None keeps the current name; returns None when the row is gone.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
    ) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name)
            WHERE id = $1
            RETURNING id, name, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl SubCategory {
    pub async fn count(db: &PgPool, category_id: Option<Uuid>) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subcategories WHERE ($1::uuid IS NULL OR category_id = $1)",
        )
        .bind(category_id)
        .fetch_one(db)
        .await?;
        Ok(count)
    }

    pub async fn list(
        db: &PgPool,
        category_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<SubCategory>> {
        let rows = sqlx::query_as::<_, SubCategory>(
            r#"
            SELECT id, name, category_id, created_at
            FROM subcategories
            WHERE ($1::uuid IS NULL OR category_id = $1)
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<SubCategory>> {
        let row = sqlx::query_as::<_, SubCategory>(
            "SELECT id, name, category_id, created_at FROM subcategories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, name: &str, category_id: Uuid) -> anyhow::Result<SubCategory> {
        let row = sqlx::query_as::<_, SubCategory>(
            r#"
            INSERT INTO subcategories (name, category_id)
            VALUES ($1, $2)
            RETURNING id, name, category_id, created_at
            "#,
        )
        .bind(name)
        .bind(category_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        category_id: Option<Uuid>,
    ) -> anyhow::Result<Option<SubCategory>> {
        let row = sqlx::query_as::<_, SubCategory>(
            r#"
            UPDATE subcategories
            SET name = COALESCE($2, name),
                category_id = COALESCE($3, category_id)
            WHERE id = $1
            RETURNING id, name, category_id, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM subcategories WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, quantity, subcategory_id, thumbnail, additional_images, created_at";

impl Product {
    pub async fn count(db: &PgPool, search: Option<&str>) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(search)
        .fetch_one(db)
        .await?;
        Ok(count)
    }

    pub async fn list(
        db: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        name: &str,
        description: &str,
        price: f64,
        quantity: i32,
        subcategory_id: Uuid,
        thumbnail: Option<&str>,
        additional_images: Option<serde_json::Value>,
    ) -> anyhow::Result<Product> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, quantity, subcategory_id, thumbnail, additional_images)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(quantity)
        .bind(subcategory_id)
        .bind(thumbnail)
        .bind(additional_images)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Full replace: every column is set, nullable ones to the given
    /// values including NULL.
    #[allow(clippy::too_many_arguments)]
    pub async fn replace(
        db: &PgPool,
        id: Uuid,
        name: &str,
        description: &str,
        price: f64,
        quantity: i32,
        subcategory_id: Uuid,
        thumbnail: Option<&str>,
        additional_images: Option<serde_json::Value>,
    ) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, quantity = $5,
                subcategory_id = $6, thumbnail = $7, additional_images = $8
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(quantity)
        .bind(subcategory_id)
        .bind(thumbnail)
        .bind(additional_images)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Partial update: None keeps the current value.
    #[allow(clippy::too_many_arguments)]
    pub async fn patch(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        price: Option<f64>,
        quantity: Option<i32>,
        subcategory_id: Option<Uuid>,
        thumbnail: Option<&str>,
        additional_images: Option<serde_json::Value>,
    ) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                quantity = COALESCE($5, quantity),
                subcategory_id = COALESCE($6, subcategory_id),
                thumbnail = COALESCE($7, thumbnail),
                additional_images = COALESCE($8, additional_images)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(quantity)
        .bind(subcategory_id)
        .bind(thumbnail)
        .bind(additional_images)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
