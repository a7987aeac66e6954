//! Inventory overview and low-stock report
//!
//! Read-only views derived from product and variant rows. A variable
//! product contributes one row per variant, never a row for the parent.
//! Severity classification is one pure function so the thresholds have a
//! single place to change.

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Product, Variant};
use crate::db::repository::ProductRepository;
use crate::inventory::ledger::parse_record_id;
use crate::utils::types::clamp_pagination;
use crate::utils::{AppResult, Paginated};

/// Low-stock severity, most urgent last
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
    OutOfStock,
}

/// Stock status shown on an overview row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

/// Classify available quantity against a low-stock threshold
///
/// `None` means the item is healthy and does not belong in the report.
/// Critical kicks in at half the threshold (integer division).
pub fn classify_severity(available: i64, threshold: i64) -> Option<Severity> {
    if available <= 0 {
        Some(Severity::OutOfStock)
    } else if available <= threshold / 2 {
        Some(Severity::Critical)
    } else if available <= threshold {
        Some(Severity::Warning)
    } else {
        None
    }
}

fn stock_status(available: i64, threshold: i64) -> StockStatus {
    if available <= 0 {
        StockStatus::OutOfStock
    } else if available <= threshold {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Overview filter for the stock status column
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatusFilter {
    #[default]
    All,
    Low,
    Out,
    In,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Name,
    Stock,
    Sku,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Overview listing request
#[derive(Debug, Clone, Default)]
pub struct OverviewQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub stock_status: StockStatusFilter,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// One row of the overview: a simple product or a single variant
#[derive(Debug, Clone, Serialize)]
pub struct InventoryRow {
    pub product_id: String,
    /// False for products sold without stock tracking; such rows are always
    /// `in_stock` and never enter the low-stock report
    pub manage_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<String>,
    pub name: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub stock_quantity: i64,
    pub reserved_quantity: i64,
    pub available: i64,
    pub low_stock_threshold: i64,
    pub status: StockStatus,
    pub updated_at: i64,
}

/// Low-stock report entry
#[derive(Debug, Clone, Serialize)]
pub struct LowStockItem {
    #[serde(flatten)]
    pub row: InventoryRow,
    pub severity: Severity,
}

#[derive(Clone)]
pub struct InventoryOverview {
    products: ProductRepository,
    /// Global default when neither variant nor product carries a threshold
    default_threshold: i64,
}

impl InventoryOverview {
    pub fn new(db: Surreal<Db>, default_threshold: i64) -> Self {
        Self {
            products: ProductRepository::new(db),
            default_threshold,
        }
    }

    fn product_row(&self, product: &Product) -> InventoryRow {
        let threshold = product.low_stock_threshold.unwrap_or(self.default_threshold);
        let available = product.available();
        let status = if product.manage_stock {
            stock_status(available, threshold)
        } else {
            // Untracked products are always sellable
            StockStatus::InStock
        };
        InventoryRow {
            product_id: product.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
            manage_stock: product.manage_stock,
            variation_id: None,
            name: product.name.clone(),
            sku: product.sku.clone(),
            size: None,
            color: None,
            stock_quantity: product.stock_quantity,
            reserved_quantity: product.reserved_quantity,
            available,
            low_stock_threshold: threshold,
            status,
            updated_at: product.updated_at,
        }
    }

    fn variant_row(&self, product: &Product, variant: &Variant) -> InventoryRow {
        // Variant threshold falls back to the parent's, then the global default
        let threshold = variant
            .low_stock_threshold
            .or(product.low_stock_threshold)
            .unwrap_or(self.default_threshold);
        let available = variant.available();
        InventoryRow {
            product_id: product.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
            manage_stock: true,
            variation_id: variant.id.as_ref().map(|i| i.to_string()),
            name: product.name.clone(),
            sku: variant.sku.clone(),
            size: variant.size.clone(),
            color: variant.color.clone(),
            stock_quantity: variant.stock_quantity,
            reserved_quantity: variant.reserved_quantity,
            available,
            low_stock_threshold: threshold,
            status: stock_status(available, threshold),
            updated_at: product.updated_at,
        }
    }

    /// Assemble all rows for active products, one per simple product or variant
    ///
    /// Products without stock management contribute a single always-in-stock
    /// row regardless of variants.
    async fn collect_rows(&self, category: Option<String>) -> AppResult<Vec<InventoryRow>> {
        let category = category
            .as_deref()
            .map(|c| parse_record_id("category", c))
            .transpose()?;
        let products = self.products.find_active(category).await?;

        let variable_ids: Vec<_> = products
            .iter()
            .filter(|p| p.manage_stock && p.has_variants)
            .filter_map(|p| p.id.clone())
            .collect();
        let variants = if variable_ids.is_empty() {
            Vec::new()
        } else {
            self.products.find_variants_for(&variable_ids).await?
        };

        let mut rows = Vec::new();
        for product in &products {
            if product.manage_stock && product.has_variants {
                let product_id = product.id.clone();
                for variant in variants.iter().filter(|v| Some(&v.product) == product_id.as_ref()) {
                    rows.push(self.variant_row(product, variant));
                }
            } else {
                rows.push(self.product_row(product));
            }
        }
        Ok(rows)
    }

    /// Paginated overview across simple products and variants
    pub async fn get_inventory_overview(
        &self,
        query: OverviewQuery,
    ) -> AppResult<Paginated<InventoryRow>> {
        let (page, per_page) = clamp_pagination(query.page, query.per_page);
        let mut rows = self.collect_rows(query.category).await?;

        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            rows.retain(|r| {
                r.name.to_lowercase().contains(&needle) || r.sku.to_lowercase().contains(&needle)
            });
        }

        rows.retain(|r| match query.stock_status {
            StockStatusFilter::All => true,
            StockStatusFilter::Low => r.status == StockStatus::LowStock,
            StockStatusFilter::Out => r.status == StockStatus::OutOfStock,
            StockStatusFilter::In => r.status == StockStatus::InStock,
        });

        rows.sort_by(|a, b| {
            let ord = match query.sort_by {
                SortBy::Name => a.name.cmp(&b.name),
                SortBy::Sku => a.sku.cmp(&b.sku),
                SortBy::Stock => a.stock_quantity.cmp(&b.stock_quantity),
                SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            match query.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total = rows.len() as i64;
        let start = ((page - 1) * per_page) as usize;
        let data: Vec<InventoryRow> = rows
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        Ok(Paginated {
            data,
            total,
            page,
            per_page,
        })
    }

    /// Items at or below their low-stock threshold, most urgent first
    pub async fn get_low_stock_items(
        &self,
        category: Option<String>,
        include_out_of_stock: bool,
    ) -> AppResult<Vec<LowStockItem>> {
        let rows = self.collect_rows(category).await?;

        let mut items: Vec<LowStockItem> = rows
            .into_iter()
            .filter_map(|row| {
                if !row.manage_stock {
                    return None;
                }
                let severity = classify_severity(row.available, row.low_stock_threshold)?;
                if severity == Severity::OutOfStock && !include_out_of_stock {
                    return None;
                }
                Some(LowStockItem { row, severity })
            })
            .collect();

        items.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.row.available.cmp(&b.row.available))
        });
        Ok(items)
    }
}
