//! Product repository

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, Variant, VariantCreate};
use crate::utils::now_millis;

const PRODUCT_TABLE: &str = "product";
const VARIANT_TABLE: &str = "variant";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self.base.db().select(id.clone()).await?;
        Ok(product)
    }

    pub async fn find_variant(&self, id: &RecordId) -> RepoResult<Option<Variant>> {
        let variant: Option<Variant> = self.base.db().select(id.clone()).await?;
        Ok(variant)
    }

    /// All active products, stock-managed or not
    pub async fn find_active(&self, category: Option<RecordId>) -> RepoResult<Vec<Product>> {
        let mut query = "SELECT * FROM product WHERE is_active = true".to_string();
        if category.is_some() {
            query.push_str(" AND category = $category");
        }
        query.push_str(" ORDER BY name");

        let mut q = self.base.db().query(&query);
        if let Some(c) = category {
            q = q.bind(("category", c));
        }
        let products: Vec<Product> = q.await?.take(0)?;
        Ok(products)
    }

    /// Variants belonging to any of the given products
    pub async fn find_variants_for(&self, products: &[RecordId]) -> RepoResult<Vec<Variant>> {
        let variants: Vec<Variant> = self
            .base
            .db()
            .query("SELECT * FROM variant WHERE product IN $products ORDER BY sku")
            .bind(("products", products.to_vec()))
            .await?
            .take(0)?;
        Ok(variants)
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let now = now_millis();
        let category = match data.category {
            Some(c) => Some(
                c.parse::<RecordId>()
                    .map_err(|_| RepoError::Validation(format!("invalid category id: {c}")))?,
            ),
            None => None,
        };
        let product = Product {
            id: None,
            name: data.name,
            sku: data.sku,
            manage_stock: data.manage_stock.unwrap_or(true),
            has_variants: false,
            stock_quantity: data.stock_quantity.unwrap_or(0),
            reserved_quantity: 0,
            low_stock_threshold: data.low_stock_threshold,
            category,
            is_active: true,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Add a variant to a product, flipping the parent to variable
    ///
    /// The parent's own counters are zeroed; a variable product carries its
    /// stock exclusively on variant rows.
    pub async fn create_variant(
        &self,
        product_id: &RecordId,
        data: VariantCreate,
    ) -> RepoResult<Variant> {
        let parent: Option<Product> = self.base.db().select(product_id.clone()).await?;
        if parent.is_none() {
            return Err(RepoError::NotFound(format!("Product {product_id}")));
        }

        let variant = Variant {
            id: None,
            product: product_id.clone(),
            sku: data.sku,
            size: data.size,
            color: data.color,
            stock_quantity: data.stock_quantity.unwrap_or(0),
            reserved_quantity: 0,
            low_stock_threshold: data.low_stock_threshold,
            version: 0,
        };

        let created: Option<Variant> = self
            .base
            .db()
            .create(VARIANT_TABLE)
            .content(variant)
            .await?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create variant".to_string()))?;

        self.base
            .db()
            .query(
                "UPDATE $product SET has_variants = true, stock_quantity = 0, \
                 reserved_quantity = 0, version += 1, updated_at = $now",
            )
            .bind(("product", product_id.clone()))
            .bind(("now", now_millis()))
            .await?
            .check()?;

        Ok(created)
    }
}
