//! On-disk engine smoke test
//!
//! The other integration tests run against the in-memory engine; this one
//! checks that the RocksDB path used in production opens, applies the schema
//! and serves the same guarded adjustment path.

use store_server::db::DbService;
use store_server::db::models::ProductCreate;
use store_server::db::repository::ProductRepository;
use store_server::inventory::events::stock_event_channel;
use store_server::inventory::ledger::{StockAdjustment, StockLedger};
use shared::MovementType;

#[tokio::test]
async fn test_rocksdb_backed_adjustment() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("data");
    let db = DbService::new(db_path.to_str().expect("utf-8 path"))
        .await
        .expect("open rocksdb");

    let products = ProductRepository::new(db.db.clone());
    let product = products
        .create(ProductCreate {
            name: "Brown Bear 30cm".to_string(),
            sku: "BEAR-30".to_string(),
            manage_stock: Some(true),
            stock_quantity: Some(0),
            low_stock_threshold: None,
            category: None,
        })
        .await
        .expect("create product")
        .id
        .expect("product id");

    let (events, _rx) = stock_event_channel();
    let ledger = StockLedger::new(db.db.clone(), events);
    let outcome = ledger
        .adjust_stock(
            StockAdjustment {
                product_id: product.to_string(),
                variation_id: None,
                quantity: 7,
                movement_type: MovementType::Import,
                reason: "initial stock intake".to_string(),
                reference_id: None,
            },
            "user:1",
            "admin",
        )
        .await
        .expect("adjust");
    assert_eq!(outcome.new_stock, 7);

    let stored = products
        .find_by_id(&product)
        .await
        .expect("find product")
        .expect("product exists");
    assert_eq!(stored.stock_quantity, 7);
}
