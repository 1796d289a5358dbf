//! End-to-end shopping scenarios across simulated CLI invocations.
//!
//! Each `reopen` serializes the session and restores it against a fresh
//! directory handle, so state only survives through `session.json`-style
//! JSON and `users.json`.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use shopfront_core::{Cart, Email, ProductId};
use shopfront_integration_tests::{TestContext, password};
use shopfront_session::{ProductCatalog, SessionError, UserDirectory};

fn quantities(cart: &Cart) -> HashMap<i32, u32> {
    cart.lines()
        .iter()
        .map(|line| (line.product_id().as_i32(), line.quantity.get()))
        .collect()
}

#[tokio::test]
async fn test_anonymous_cart_merges_into_account_across_invocations() {
    let ctx = TestContext::new().await;
    ctx.stock(1, "Backpack", "109.95", 5).await;
    ctx.stock(2, "Shirt", "22.30", 5).await;
    ctx.stock(3, "Jacket", "55.99", 5).await;

    // First visit: register with B and C already in the account.
    let mut store = ctx.store();
    store
        .add_to_cart(ctx.catalog.get_by_id(ProductId::new(2)).await.unwrap())
        .await
        .unwrap();
    store.set_quantity(ProductId::new(2), 3).await.unwrap();
    store
        .add_to_cart(ctx.catalog.get_by_id(ProductId::new(3)).await.unwrap())
        .await
        .unwrap();
    store
        .register("Ada", "ada@example.com", &password("hunter2 hunter2"))
        .await
        .unwrap();
    store.clear_cart().await.unwrap();

    // Next invocation: browse anonymously with A:2 and B:1.
    let mut store = ctx.reopen(store);
    for id in [1, 1, 2] {
        let product = ctx.catalog.get_by_id(ProductId::new(id)).await.unwrap();
        store.add_to_cart(product).await.unwrap();
    }

    let mut store = ctx.reopen(store);
    store
        .login("ada@example.com", &password("hunter2 hunter2"))
        .await
        .unwrap();

    let expected = HashMap::from([(1, 2), (2, 4), (3, 1)]);
    assert_eq!(quantities(store.active_cart()), expected);

    let on_disk = ctx
        .directory()
        .find_by_email(&Email::parse("ada@example.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(quantities(&on_disk.cart), expected);
    assert_eq!(
        store.active_cart().subtotal().unwrap().to_string(),
        "$365.09"
    );
}

#[tokio::test]
async fn test_logout_then_login_restores_persisted_cart() {
    let ctx = TestContext::new().await;
    ctx.stock(7, "Mug", "4.50", 10).await;

    let mut store = ctx.store();
    store
        .register("Bo", "bo@example.com", &password("s3cret pass"))
        .await
        .unwrap();
    store
        .login("bo@example.com", &password("s3cret pass"))
        .await
        .unwrap();
    store
        .add_to_cart(ctx.catalog.get_by_id(ProductId::new(7)).await.unwrap())
        .await
        .unwrap();
    store
        .add_to_wishlist(ctx.catalog.get_by_id(ProductId::new(7)).await.unwrap())
        .await
        .unwrap();

    let mut store = ctx.reopen(store);
    store.logout().await.unwrap();
    assert!(store.active_cart().is_empty());
    assert!(store.active_wishlist().is_empty());

    let mut store = ctx.reopen(store);
    store
        .login("bo@example.com", &password("s3cret pass"))
        .await
        .unwrap();
    assert_eq!(store.active_cart().quantity_of(ProductId::new(7)), 1);
    assert!(store.active_wishlist().contains(ProductId::new(7)));
}

#[tokio::test]
async fn test_registered_accounts_survive_and_reject_duplicates() {
    let ctx = TestContext::new().await;

    let mut store = ctx.store();
    store
        .register("Cy", "cy@example.com", &password("pw one two"))
        .await
        .unwrap();

    let mut store = ctx.reopen(store);
    let err = store
        .register("Cy again", "cy@example.com", &password("other"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::DuplicateAccount));

    let accounts = ctx.directory().list().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts.first().unwrap().display_name, "Cy");

    let raw = std::fs::read_to_string(ctx.users_path()).unwrap();
    assert!(!raw.contains("pw one two"));
}

#[tokio::test]
async fn test_out_of_stock_product_can_be_added() {
    let ctx = TestContext::new().await;
    ctx.stock(9, "Limited Print", "80.00", 0).await;

    let product = ctx.catalog.get_by_id(ProductId::new(9)).await.unwrap();
    assert!(!product.in_stock);

    let mut store = ctx.store();
    let quantity = store.add_to_cart(product).await.unwrap();
    assert_eq!(quantity.get(), 1);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let ctx = TestContext::new().await;
    let mut store = ctx.store();
    store
        .register("Di", "di@example.com", &password("right horse"))
        .await
        .unwrap();

    let wrong = store
        .login("di@example.com", &password("wrong horse"))
        .await
        .unwrap_err();
    let unknown = store
        .login("nobody@example.com", &password("right horse"))
        .await
        .unwrap_err();

    assert_eq!(wrong.to_string(), unknown.to_string());
    assert!(!store.is_authenticated());
}
