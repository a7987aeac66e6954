//! Order lifecycle integration tests against an in-memory database

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use store_server::db::DbService;
use store_server::db::models::{Order, OrderCreate, OrderItemCreate, ProductCreate};
use store_server::db::repository::{InventoryRepository, ProductRepository, StockTarget};
use store_server::inventory::events::stock_event_channel;
use store_server::orders::OrderLifecycle;
use store_server::utils::{AppError, HOUR_MS, MINUTE_MS, now_millis};
use shared::{OrderStatus, PaymentMethod};

struct Harness {
    db: Surreal<Db>,
    lifecycle: OrderLifecycle,
    products: ProductRepository,
    inventory: InventoryRepository,
}

async fn setup() -> Harness {
    let db = DbService::memory().await.expect("in-memory db");
    let (events, _rx) = stock_event_channel();
    Harness {
        lifecycle: OrderLifecycle::new(db.db.clone(), events, 30 * MINUTE_MS, 24 * HOUR_MS),
        products: ProductRepository::new(db.db.clone()),
        inventory: InventoryRepository::new(db.db.clone()),
        db: db.db,
    }
}

async fn seed_product(h: &Harness, name: &str, sku: &str, stock: i64) -> RecordId {
    h.products
        .create(ProductCreate {
            name: name.to_string(),
            sku: sku.to_string(),
            manage_stock: Some(true),
            stock_quantity: Some(stock),
            low_stock_threshold: None,
            category: None,
        })
        .await
        .expect("create product")
        .id
        .expect("product id")
}

async fn place_order(
    h: &Harness,
    payment_method: PaymentMethod,
    items: Vec<(RecordId, i64)>,
) -> Order {
    h.lifecycle
        .create_order(
            OrderCreate {
                payment_method,
                items: items
                    .into_iter()
                    .map(|(product, quantity)| OrderItemCreate {
                        product_id: product.to_string(),
                        variation_id: None,
                        quantity,
                    })
                    .collect(),
            },
            "customer",
        )
        .await
        .expect("place order")
}

async fn reserved_quantity(h: &Harness, product: &RecordId) -> i64 {
    h.inventory
        .find_target(&StockTarget::Product(product.clone()))
        .await
        .expect("find target")
        .expect("row exists")
        .reserved_quantity
}

/// Backdate an order so the timeout sweep sees it as expired
async fn backdate(h: &Harness, order: &Order, by_ms: i64) {
    let id = order.id.clone().expect("order id");
    h.db.query("UPDATE $id SET created_at = $t")
        .bind(("id", id))
        .bind(("t", now_millis() - by_ms))
        .await
        .expect("backdate")
        .check()
        .expect("backdate check");
}

#[tokio::test]
async fn test_placing_an_order_reserves_stock() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;

    let order = place_order(&h, PaymentMethod::Vietqr, vec![(bear.clone(), 3)]).await;
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(!order.stock_released);
    assert_eq!(reserved_quantity(&h, &bear).await, 3);
}

#[tokio::test]
async fn test_failed_reservation_rolls_back_earlier_items() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;
    let scarce = seed_product(&h, "Polar Bear 40cm", "POLAR-40", 1).await;

    let result = h
        .lifecycle
        .create_order(
            OrderCreate {
                payment_method: PaymentMethod::Cod,
                items: vec![
                    OrderItemCreate {
                        product_id: bear.to_string(),
                        variation_id: None,
                        quantity: 2,
                    },
                    OrderItemCreate {
                        product_id: scarce.to_string(),
                        variation_id: None,
                        quantity: 5,
                    },
                ],
            },
            "customer",
        )
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock(_))));

    // The first item's reservation was handed back
    assert_eq!(reserved_quantity(&h, &bear).await, 0);
    assert_eq!(reserved_quantity(&h, &scarce).await, 0);
}

#[tokio::test]
async fn test_bulk_approve_isolates_failures() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;
    let good = place_order(&h, PaymentMethod::Vietqr, vec![(bear.clone(), 1)]).await;
    let good_id = good.id.expect("order id").to_string();

    let result = h
        .lifecycle
        .bulk_approve(
            &[good_id.clone(), "order:missing".to_string()],
            "admin",
        )
        .await
        .expect("batch");
    assert_eq!(result.success, 1);
    assert_eq!(result.failed, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].order_id, "order:missing");

    let approved = h.lifecycle.find_order(&good_id).await.expect("find order");
    assert_eq!(approved.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_bulk_approve_rejects_non_pending() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;
    let order = place_order(&h, PaymentMethod::Vietqr, vec![(bear, 1)]).await;
    let id = order.id.expect("order id").to_string();

    let first = h
        .lifecycle
        .bulk_approve(&[id.clone()], "admin")
        .await
        .expect("batch");
    assert_eq!(first.success, 1);

    let second = h
        .lifecycle
        .bulk_approve(&[id.clone()], "admin")
        .await
        .expect("batch");
    assert_eq!(second.success, 0);
    assert_eq!(second.failed, 1);

    let order = h.lifecycle.find_order(&id).await.expect("find order");
    assert_eq!(order.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_bulk_update_validates_transitions_per_order() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;
    let pending = place_order(&h, PaymentMethod::Vietqr, vec![(bear.clone(), 1)]).await;
    let pending_id = pending.id.expect("order id").to_string();
    let confirmed = place_order(&h, PaymentMethod::Vietqr, vec![(bear, 1)]).await;
    let confirmed_id = confirmed.id.expect("order id").to_string();
    h.lifecycle
        .bulk_approve(&[confirmed_id.clone()], "admin")
        .await
        .expect("batch");

    // confirmed -> processing is legal, pending -> processing is not
    let result = h
        .lifecycle
        .bulk_update_status(
            &[confirmed_id.clone(), pending_id.clone()],
            OrderStatus::Processing,
            "admin",
        )
        .await
        .expect("batch");
    assert_eq!(result.success, 1);
    assert_eq!(result.failed, 1);
    assert_eq!(result.errors[0].order_id, pending_id);

    let untouched = h.lifecycle.find_order(&pending_id).await.expect("find");
    assert_eq!(untouched.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_bulk_update_to_current_status_is_a_noop_success() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;
    let order = place_order(&h, PaymentMethod::Vietqr, vec![(bear, 1)]).await;
    let id = order.id.expect("order id").to_string();

    let result = h
        .lifecycle
        .bulk_update_status(&[id.clone()], OrderStatus::Pending, "admin")
        .await
        .expect("batch");
    assert_eq!(result.success, 1);
    assert_eq!(result.failed, 0);

    // No write happened: version unchanged, no history entry
    let unchanged = h.lifecycle.find_order(&id).await.expect("find order");
    assert_eq!(unchanged.version, order.version);
    let history = h.lifecycle.order_history(&id).await.expect("history");
    assert!(history.iter().all(|e| e.action != "status_changed"));
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let h = setup().await;

    let err = h
        .lifecycle
        .bulk_approve(&[], "admin")
        .await
        .expect_err("empty batch");
    assert!(matches!(err, AppError::Validation(_)));

    let err = h
        .lifecycle
        .bulk_update_status(&[], OrderStatus::Confirmed, "admin")
        .await
        .expect_err("empty batch");
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_confirmed_order_keeps_reservation_through_sweep() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;

    // Confirmed past its payment window: the sweep must not touch it
    let order = place_order(&h, PaymentMethod::Vietqr, vec![(bear.clone(), 4)]).await;
    let id = order.id.expect("order id").to_string();
    h.lifecycle
        .bulk_approve(&[id.clone()], "admin")
        .await
        .expect("batch");
    let confirmed = h.lifecycle.find_order(&id).await.expect("find order");
    backdate(&h, &confirmed, 2 * HOUR_MS).await;

    let sweep = h.lifecycle.auto_cancel_timed_out().await.expect("sweep");
    assert_eq!(sweep.scanned, 0);
    assert_eq!(sweep.cancelled, 0);

    let after = h.lifecycle.find_order(&id).await.expect("find order");
    assert_eq!(after.status, OrderStatus::Confirmed);
    assert!(!after.stock_released);
    assert_eq!(reserved_quantity(&h, &bear).await, 4);
}

#[tokio::test]
async fn test_auto_cancel_respects_payment_method_windows() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;

    // 31 minutes old: past the 30-minute QR window
    let qr = place_order(&h, PaymentMethod::Vietqr, vec![(bear.clone(), 2)]).await;
    backdate(&h, &qr, 31 * MINUTE_MS).await;

    // 1 hour old: well inside the 24-hour COD window
    let cod = place_order(&h, PaymentMethod::Cod, vec![(bear.clone(), 3)]).await;
    backdate(&h, &cod, HOUR_MS).await;

    let sweep = h
        .lifecycle
        .auto_cancel_timed_out()
        .await
        .expect("sweep");
    assert_eq!(sweep.scanned, 1);
    assert_eq!(sweep.cancelled, 1);
    assert_eq!(sweep.failed, 0);

    let qr_id = qr.id.expect("order id").to_string();
    let qr = h.lifecycle.find_order(&qr_id).await.expect("find qr");
    assert_eq!(qr.status, OrderStatus::Cancelled);
    assert!(qr.stock_released);

    let cod_id = cod.id.expect("order id").to_string();
    let cod = h.lifecycle.find_order(&cod_id).await.expect("find cod");
    assert_eq!(cod.status, OrderStatus::Pending);

    // Only the COD reservation is still held
    assert_eq!(reserved_quantity(&h, &bear).await, 3);
}

#[tokio::test]
async fn test_auto_cancel_sweep_is_rerunnable() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;
    let order = place_order(&h, PaymentMethod::Momo, vec![(bear.clone(), 2)]).await;
    backdate(&h, &order, 45 * MINUTE_MS).await;

    let first = h.lifecycle.auto_cancel_timed_out().await.expect("sweep");
    assert_eq!(first.cancelled, 1);

    let second = h.lifecycle.auto_cancel_timed_out().await.expect("sweep");
    assert_eq!(second.scanned, 0);
    assert_eq!(second.cancelled, 0);
    assert_eq!(reserved_quantity(&h, &bear).await, 0);
}

#[tokio::test]
async fn test_release_stock_runs_at_most_once() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;
    let order = place_order(&h, PaymentMethod::Vietqr, vec![(bear.clone(), 4)]).await;
    let id = order.id.clone().expect("order id").to_string();

    let first = h
        .lifecycle
        .release_stock(&order, "admin")
        .await
        .expect("first release");
    assert!(first.performed);
    assert!(first.failures.is_empty());
    assert_eq!(reserved_quantity(&h, &bear).await, 0);

    // The flag has flipped; a second call does nothing
    let reread = h.lifecycle.find_order(&id).await.expect("find order");
    let second = h
        .lifecycle
        .release_stock(&reread, "admin")
        .await
        .expect("second release");
    assert!(!second.performed);
    assert_eq!(reserved_quantity(&h, &bear).await, 0);
}

#[tokio::test]
async fn test_history_records_the_lifecycle() {
    let h = setup().await;
    let bear = seed_product(&h, "Brown Bear 30cm", "BEAR-30", 10).await;
    let order = place_order(&h, PaymentMethod::Vietqr, vec![(bear, 1)]).await;
    let id = order.id.expect("order id").to_string();

    h.lifecycle
        .bulk_approve(&[id.clone()], "admin")
        .await
        .expect("batch");

    let history = h.lifecycle.order_history(&id).await.expect("history");
    let actions: Vec<&str> = history.iter().map(|e| e.action.as_str()).collect();
    assert!(actions.contains(&"order_created"));
    assert!(actions.contains(&"status_changed"));

    let changed = history
        .iter()
        .find(|e| e.action == "status_changed")
        .expect("status change entry");
    assert_eq!(changed.actor_name, "admin");
}
