//! End-to-end cart scenarios.
//!
//! These tests drive the store the way the cart screens do and check the
//! derived values the floating cart badge displays.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex, PoisonError};

use gomarketplace_cart::{CartStore, CartSummary, CartView, MemoryStorage, StorageKey};
use gomarketplace_core::ProductId;
use gomarketplace_integration_tests::{brl, product};
use rust_decimal::Decimal;

async fn ready_store() -> CartStore<MemoryStorage> {
    let store = CartStore::new(MemoryStorage::new(), StorageKey::default());
    store.hydrate().await.unwrap();
    store
}

#[tokio::test]
async fn test_add_increment_decrement_to_zero() {
    let store = ready_store().await;
    let p1 = ProductId::new("p1");

    let snapshot = store.add_to_cart(product("p1", 10)).await.unwrap();
    assert_eq!(snapshot.items()[0].quantity, 1);
    assert_eq!(snapshot.item_count(), 1);
    assert_eq!(snapshot.formatted_total(brl), brl(Decimal::from(10)));

    let snapshot = store.increment(&p1).await.unwrap();
    assert_eq!(snapshot.items()[0].quantity, 2);
    assert_eq!(snapshot.formatted_total(brl), brl(Decimal::from(20)));

    let snapshot = store.decrement(&p1).await.unwrap();
    assert_eq!(snapshot.items()[0].quantity, 1);

    let snapshot = store.decrement(&p1).await.unwrap();
    assert_eq!(snapshot.items()[0].quantity, 0);
    assert_eq!(snapshot.formatted_total(brl), brl(Decimal::ZERO));

    // Floor holds and the line stays
    let snapshot = store.decrement(&p1).await.unwrap();
    assert_eq!(snapshot.items()[0].quantity, 0);
    assert_eq!(snapshot.len(), 1);
}

#[tokio::test]
async fn test_total_is_recomputed_after_every_mutation() {
    let store = ready_store().await;
    let ids = ["a", "b", "c"];
    let prices = [3, 7, 11];

    for (id, price) in ids.iter().zip(prices) {
        store.add_to_cart(product(id, price)).await.unwrap();
    }

    let steps: [(&str, bool); 8] = [
        ("a", true),
        ("b", true),
        ("b", true),
        ("c", false),
        ("c", false),
        ("a", false),
        ("zzz", true),
        ("b", false),
    ];

    for (id, up) in steps {
        let id = ProductId::new(id);
        let snapshot = if up {
            store.increment(&id).await.unwrap()
        } else {
            store.decrement(&id).await.unwrap()
        };

        let expected: Decimal = snapshot
            .items()
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum();
        let count: u64 = snapshot.items().iter().map(|l| u64::from(l.quantity)).sum();
        assert_eq!(snapshot.total(), expected);
        assert_eq!(snapshot.item_count(), count);
    }

    let quantities: Vec<_> = store.snapshot().items().iter().map(|l| l.quantity).collect();
    assert_eq!(quantities, vec![1, 2, 0]);
    assert_eq!(store.snapshot().total(), Decimal::from(17));
}

#[tokio::test]
async fn test_badge_tracks_cart_through_subscription() {
    let store = ready_store().await;
    let labels = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&labels);
    store.subscribe(move |snapshot| {
        let summary = CartSummary::from_snapshot(snapshot, brl);
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{} {}", summary.label(), summary.total));
    });

    store.add_to_cart(product("p1", 10)).await.unwrap();
    store.add_to_cart(product("p2", 5)).await.unwrap();
    store.increment(&ProductId::new("p2")).await.unwrap();

    let labels = labels.lock().unwrap_or_else(PoisonError::into_inner).clone();
    assert_eq!(
        labels,
        vec![
            "1 itens R$ 10,00".to_string(),
            "2 itens R$ 15,00".to_string(),
            "3 itens R$ 20,00".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_cart_screen_view() {
    let store = ready_store().await;
    store.add_to_cart(product("p1", 10)).await.unwrap();
    store.increment(&ProductId::new("p1")).await.unwrap();

    let view = CartView::from_snapshot(&store.snapshot(), brl);
    assert_eq!(view.item_count, 2);
    assert_eq!(view.subtotal, "R$ 20,00");
    assert_eq!(view.items[0].title, "Product p1");
    assert_eq!(view.items[0].line_price, "R$ 20,00");
}

#[tokio::test]
async fn test_views_share_one_store() {
    let store = ready_store().await;
    let badge = store.clone();
    let screen = store.clone();

    screen.add_to_cart(product("p1", 4)).await.unwrap();
    assert_eq!(badge.snapshot().item_count(), 1);
    assert!(badge.snapshot() == store.snapshot());
}

#[tokio::test]
async fn test_watch_receiver_follows_updates_from_task() {
    let store = ready_store().await;
    let mut rx = store.watch();

    let writer = store.clone();
    tokio::spawn(async move {
        writer.add_to_cart(product("p1", 10)).await.unwrap();
        writer.increment(&ProductId::new("p1")).await.unwrap();
    })
    .await
    .unwrap();

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().item_count(), 2);
}
