//! # Catalog Repository
//!
//! CRUD for products, variants, and categories. The catalog is the mutable
//! side of the store: stock levels move here, while committed sales carry
//! frozen copies of whatever the catalog said at the time.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use atelier_core::{Category, Product, ProductVariant};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    barcode: String,
    category_id: String,
    price_cents: i64,
    cost_price_cents: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    size: String,
    color: String,
    stock: i64,
    sku: String,
}

impl ProductRow {
    fn into_product(self, variants: Vec<ProductVariant>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            barcode: self.barcode,
            category_id: self.category_id,
            price_cents: self.price_cents,
            cost_price_cents: self.cost_price_cents,
            variants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<VariantRow> for ProductVariant {
    fn from(row: VariantRow) -> Self {
        ProductVariant {
            size: row.size,
            color: row.color,
            stock: row.stock,
            sku: row.sku,
        }
    }
}

/// Repository for products and categories.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inserts a product with all its variants in one transaction.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, barcode, category_id,
                price_cents, cost_price_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(&product.category_id)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, variant) in product.variants.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO product_variants (product_id, size, color, stock, sku, position)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&product.id)
            .bind(&variant.size)
            .bind(&variant.color)
            .bind(variant.stock)
            .bind(&variant.sku)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(id = %product.id, variants = product.variants.len(), "Product inserted");
        Ok(())
    }

    /// Fetches a product by id with its variants, in display order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, barcode, category_id,
                   price_cents, cost_price_cents, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Looks up a product by exact barcode (the scanner path).
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, barcode, category_id,
                   price_cents, cost_price_cents, created_at, updated_at
            FROM products
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Searches products by name or barcode substring. An empty query
    /// behaves like [`list`](Self::list).
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self.list().await;
        }

        let pattern = format!("%{trimmed}%");
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, barcode, category_id,
                   price_cents, cost_price_cents, created_at, updated_at
            FROM products
            WHERE name LIKE ?1 OR barcode LIKE ?1
            ORDER BY name
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    /// Lists the whole catalog, sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, barcode, category_id,
                   price_cents, cost_price_cents, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    /// Lists products in one category, sorted by name.
    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, barcode, category_id,
                   price_cents, cost_price_cents, created_at, updated_at
            FROM products
            WHERE category_id = ?1
            ORDER BY name
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Sets a variant's stock level by SKU.
    pub async fn set_variant_stock(&self, sku: &str, stock: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE product_variants SET stock = ?2 WHERE sku = ?1")
            .bind(sku)
            .bind(stock)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ProductVariant", sku));
        }
        debug!(sku = %sku, stock, "Variant stock updated");
        Ok(())
    }

    pub async fn insert_category(&self, category: &Category) -> DbResult<()> {
        sqlx::query("INSERT INTO categories (id, name, color) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.color)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let rows: Vec<Category> =
            sqlx::query_as("SELECT id, name, color FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn hydrate(&self, row: ProductRow) -> DbResult<Product> {
        let variants: Vec<VariantRow> = sqlx::query_as(
            r#"
            SELECT size, color, stock, sku
            FROM product_variants
            WHERE product_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(row.into_product(variants.into_iter().map(ProductVariant::from).collect()))
    }

    async fn hydrate_all(&self, rows: Vec<ProductRow>) -> DbResult<Vec<Product>> {
        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            products.push(self.hydrate(row).await?);
        }
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_category(catalog: &CatalogRepository) -> Category {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: "Shirts".to_string(),
            color: "#2563eb".to_string(),
        };
        catalog.insert_category(&category).await.unwrap();
        category
    }

    fn sample_product(category_id: &str, name: &str, barcode: &str) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            barcode: barcode.to_string(),
            category_id: category_id.to_string(),
            price_cents: 5000,
            cost_price_cents: 2200,
            variants: vec![
                ProductVariant {
                    size: "M".to_string(),
                    color: "Black".to_string(),
                    stock: 12,
                    sku: format!("{barcode}-M-BLK"),
                },
                ProductVariant {
                    size: "L".to_string(),
                    color: "White".to_string(),
                    stock: 0,
                    sku: format!("{barcode}-L-WHT"),
                },
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = test_db().await;
        let catalog = db.catalog();
        let category = seed_category(&catalog).await;
        let product = sample_product(&category.id, "Crew Neck Tee", "11112222");

        catalog.insert(&product).await.unwrap();

        let loaded = catalog.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Crew Neck Tee");
        assert_eq!(loaded.variants.len(), 2);
        assert_eq!(loaded.variants[0].sku, "11112222-M-BLK");
        assert_eq!(loaded.variants[1].stock, 0);
    }

    #[tokio::test]
    async fn test_find_by_barcode() {
        let db = test_db().await;
        let catalog = db.catalog();
        let category = seed_category(&catalog).await;
        catalog
            .insert(&sample_product(&category.id, "Oxford Shirt", "33334444"))
            .await
            .unwrap();

        let found = catalog.find_by_barcode("33334444").await.unwrap().unwrap();
        assert_eq!(found.name, "Oxford Shirt");
        assert!(catalog.find_by_barcode("00000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let db = test_db().await;
        let catalog = db.catalog();
        let category = seed_category(&catalog).await;
        catalog
            .insert(&sample_product(&category.id, "Tee A", "55556666"))
            .await
            .unwrap();

        let err = catalog
            .insert(&sample_product(&category.id, "Tee B", "55556666"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        // A barcode collision is not the receipt-number backstop
        assert!(!err.is_receipt_collision());
    }

    #[tokio::test]
    async fn test_search_matches_name_and_barcode() {
        let db = test_db().await;
        let catalog = db.catalog();
        let category = seed_category(&catalog).await;
        catalog
            .insert(&sample_product(&category.id, "Linen Shirt", "77778888"))
            .await
            .unwrap();
        catalog
            .insert(&sample_product(&category.id, "Denim Jacket", "99990000"))
            .await
            .unwrap();

        let by_name = catalog.search("linen").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Linen Shirt");

        let by_barcode = catalog.search("9999").await.unwrap();
        assert_eq!(by_barcode.len(), 1);
        assert_eq!(by_barcode[0].name, "Denim Jacket");

        // Empty query lists everything
        assert_eq!(catalog.search("  ").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_variant_stock() {
        let db = test_db().await;
        let catalog = db.catalog();
        let category = seed_category(&catalog).await;
        let product = sample_product(&category.id, "Polo", "12121212");
        catalog.insert(&product).await.unwrap();

        catalog.set_variant_stock("12121212-L-WHT", 7).await.unwrap();
        let loaded = catalog.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.variant("L", "White").unwrap().stock, 7);

        let err = catalog.set_variant_stock("NOPE", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_categories() {
        let db = test_db().await;
        let catalog = db.catalog();
        seed_category(&catalog).await;
        let categories = catalog.list_categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Shirts");
    }
}
