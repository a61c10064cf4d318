use async_trait::async_trait;
use sqlx::{error::ErrorKind, PgPool};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::dto::{like_pattern, ProductFilter, ProductView};
use super::repo_types::{Category, ProductInput, ProductRow, ProductStatus};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product {0} not found")]
    NotFound(i32),
    #[error("duplicate product name")]
    DuplicateName,
    #[error("category {0} does not exist")]
    UnknownCategory(i32),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Product and category persistence.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_products(&self, filter: &ProductFilter) -> CatalogResult<Vec<ProductView>>;
    async fn get_product(&self, id: i32) -> CatalogResult<Option<ProductView>>;
    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;

    async fn create_product(
        &self,
        input: ProductInput,
        vendor_id: Option<Uuid>,
    ) -> CatalogResult<ProductView>;
    async fn update_product(&self, id: i32, input: ProductInput) -> CatalogResult<ProductView>;
    /// Hard delete; returns the removed product.
    async fn delete_product(&self, id: i32) -> CatalogResult<ProductView>;
    async fn set_status(&self, id: i32, status: ProductStatus) -> CatalogResult<ProductView>;
}

pub struct PgCatalog {
    db: PgPool,
}

impl PgCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: i32) -> CatalogResult<ProductView> {
        self.get_product(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }
}

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.description, p.price, p.stock, p.image_url, p.data_ai_hint,
           p.category_id, c.name AS category_name, p.status
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

fn map_write_error(e: sqlx::Error, category_id: i32) -> CatalogError {
    if let sqlx::Error::Database(db) = &e {
        match db.kind() {
            ErrorKind::UniqueViolation => return CatalogError::DuplicateName,
            ErrorKind::ForeignKeyViolation => return CatalogError::UnknownCategory(category_id),
            _ => {}
        }
    }
    CatalogError::Database(e)
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn list_products(&self, filter: &ProductFilter) -> CatalogResult<Vec<ProductView>> {
        let sql = format!(
            r#"{PRODUCT_SELECT}
            WHERE ($1::text IS NULL
                   OR p.name ILIKE $1 ESCAPE '\'
                   OR p.description ILIKE $1 ESCAPE '\')
              AND ($2::text IS NULL OR c.name = $2)
              AND ($3 OR p.status = 'ACTIVE')
            ORDER BY p.name ASC
            "#
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.category.as_deref())
            .bind(filter.include_archived)
            .fetch_all(&self.db)
            .await?;
        debug!(count = rows.len(), ?filter, "products fetched");
        Ok(rows.into_iter().map(ProductView::from).collect())
    }

    async fn get_product(&self, id: i32) -> CatalogResult<Option<ProductView>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(ProductView::from))
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, image_url
            FROM categories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create_product(
        &self,
        input: ProductInput,
        vendor_id: Option<Uuid>,
    ) -> CatalogResult<ProductView> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO products
                (name, description, price, stock, image_url, data_ai_hint, category_id, vendor_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.image_url)
        .bind(&input.data_ai_hint)
        .bind(input.category_id)
        .bind(vendor_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_error(e, input.category_id))?;
        self.fetch(id).await
    }

    async fn update_product(&self, id: i32, input: ProductInput) -> CatalogResult<ProductView> {
        let updated: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE products
               SET name = $2, description = $3, price = $4, stock = $5,
                   image_url = $6, data_ai_hint = $7, category_id = $8,
                   updated_at = now()
             WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.image_url)
        .bind(&input.data_ai_hint)
        .bind(input.category_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_write_error(e, input.category_id))?;
        match updated {
            Some(id) => self.fetch(id).await,
            None => Err(CatalogError::NotFound(id)),
        }
    }

    async fn delete_product(&self, id: i32) -> CatalogResult<ProductView> {
        let product = self.fetch(id).await?;
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(CatalogError::NotFound(id));
        }
        Ok(product)
    }

    async fn set_status(&self, id: i32, status: ProductStatus) -> CatalogResult<ProductView> {
        let updated: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE products SET status = $2, updated_at = now()
             WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?;
        match updated {
            Some(id) => self.fetch(id).await,
            None => Err(CatalogError::NotFound(id)),
        }
    }
}
