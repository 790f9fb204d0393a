//! Admin panel flows: products, categories and orders.

#![allow(clippy::unwrap_used)]

use shopfront_core::{OrderNumber, OrderStatus, ProductId};
use shopfront_integration_tests::{TestContext, location};

fn lamp_form<'a>(name: &'a str, price: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", name),
        ("description", "Warm light for late reading"),
        ("price", price),
        ("category", "Home & Kitchen"),
        ("image", ""),
        ("featured", "on"),
        ("rating", "4.2"),
        ("stock", "9"),
    ]
}

#[tokio::test]
async fn test_admin_root_redirects_to_products() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/admin").await;
    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(location(&resp), "/admin/products");
}

#[tokio::test]
async fn test_admin_creates_product_visible_in_storefront() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.page("/admin/products/new").await;
    assert_eq!(status, 200);

    let resp = ctx
        .post_form("/admin/products", &lamp_form("Reading Lamp", "45.00"))
        .await;
    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(location(&resp), "/admin/products");

    let (_, body) = ctx.page("/admin/products?q=lamp").await;
    assert!(body.contains("Reading Lamp"));
    assert!(body.contains("has been added"));
    assert!(!body.contains("Smart Watch"));

    let catalog = ctx.state.products().catalog().await.unwrap();
    let lamp = catalog
        .products()
        .iter()
        .find(|p| p.name == "Reading Lamp")
        .unwrap();
    assert_eq!(lamp.id, ProductId::new(9));
    assert_eq!(lamp.stock, 9);

    let (status, body) = ctx.page("/products/9").await;
    assert_eq!(status, 200);
    assert!(body.contains("$45.00"));
}

#[tokio::test]
async fn test_admin_product_validation_rerenders_form() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post_form("/admin/products", &lamp_form("", "-3"))
        .await;
    assert_eq!(resp.status().as_u16(), 422);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Product name is required"));
    assert!(body.contains("Warm light for late reading"));

    let catalog = ctx.state.products().catalog().await.unwrap();
    assert_eq!(catalog.len(), 8);
}

#[tokio::test]
async fn test_admin_updates_and_deletes_product() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.page("/admin/products/4/edit").await;
    assert_eq!(status, 200);
    assert!(body.contains("Leather Wallet"));

    let resp = ctx
        .post_form(
            "/admin/products/4",
            &[
                ("name", "Leather Wallet"),
                ("description", "Slim bifold"),
                ("price", "35.50"),
                ("category", "Accessories"),
                ("image", ""),
                ("rating", "4.0"),
                ("stock", "3"),
            ],
        )
        .await;
    assert_eq!(resp.status().as_u16(), 303);

    let wallet = ctx
        .state
        .products()
        .get(ProductId::new(4))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(wallet.stock, 3);
    assert!(!wallet.featured);

    let resp = ctx.post_form("/admin/products/4/delete", &[]).await;
    assert_eq!(resp.status().as_u16(), 303);

    let (status, _) = ctx.page("/products/4").await;
    assert_eq!(status, 404);

    let (status, _) = ctx.page("/admin/products/4/edit").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_admin_category_rename_moves_products() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post_form(
            "/admin/categories/rename",
            &[("old", "Clothing"), ("new", "Apparel")],
        )
        .await;
    assert_eq!(resp.status().as_u16(), 303);

    let (_, body) = ctx.page("/admin/categories").await;
    assert!(body.contains("2 products updated"));

    let (_, body) = ctx.page("/products?category=Apparel").await;
    assert!(body.contains("Denim Jeans"));
    assert!(body.contains("Premium Cotton T-Shirt"));

    let categories = ctx.state.categories().list().await.unwrap();
    assert!(!categories.contains("Clothing"));
}

#[tokio::test]
async fn test_admin_category_rejections() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post_form("/admin/categories", &[("name", "Electronics")])
        .await;
    assert_eq!(resp.status().as_u16(), 422);
    assert!(resp.text().await.unwrap().contains("Category already exists"));

    let resp = ctx
        .post_form("/admin/categories/delete", &[("name", "All")])
        .await;
    assert_eq!(resp.status().as_u16(), 422);

    let resp = ctx.post_form("/admin/categories", &[("name", "  ")]).await;
    assert_eq!(resp.status().as_u16(), 422);

    let resp = ctx
        .post_form("/admin/categories", &[("name", "Garden")])
        .await;
    assert_eq!(resp.status().as_u16(), 303);

    let resp = ctx
        .post_form("/admin/categories/delete", &[("name", "Accessories")])
        .await;
    assert_eq!(resp.status().as_u16(), 303);

    // The product keeps its label after its category is deleted.
    let wallet = ctx
        .state
        .products()
        .get(ProductId::new(4))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(wallet.category, "Accessories");
}

#[tokio::test]
async fn test_admin_cancel_order_restocks() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(1, 3).await;
    let confirmation = ctx.place_order().await;
    let number = confirmation.strip_prefix("/order-confirmation/").unwrap();

    let (status, body) = ctx.page("/admin/orders").await;
    assert_eq!(status, 200);
    assert!(body.contains(number));

    let (status, body) = ctx.page(&format!("/admin/orders/{number}")).await;
    assert_eq!(status, 200);
    assert!(body.contains("Mark Cancelled"));

    let resp = ctx
        .post_form(
            &format!("/admin/orders/{number}/status"),
            &[("status", "cancelled")],
        )
        .await;
    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(location(&resp), format!("/admin/orders/{number}"));

    let headphones = ctx
        .state
        .products()
        .get(ProductId::new(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(headphones.stock, 15);

    // A cancelled order cannot be completed afterwards.
    ctx.post_form(
        &format!("/admin/orders/{number}/status"),
        &[("status", "completed")],
    )
    .await;
    let (_, body) = ctx.page(&format!("/admin/orders/{number}")).await;
    assert!(body.contains("can no longer change"));

    let order = ctx
        .state
        .orders()
        .get(&OrderNumber::parse(number).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_admin_order_status_rejects_unknown_values() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post_form("/admin/orders/ORD-AAAA1111/status", &[("status", "shipped")])
        .await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = ctx
        .post_form(
            "/admin/orders/ORD-AAAA1111/status",
            &[("status", "completed")],
        )
        .await;
    assert_eq!(resp.status().as_u16(), 404);
}
