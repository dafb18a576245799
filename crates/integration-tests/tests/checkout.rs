//! Integration tests for order placement and the dashboard figures it feeds.

use reqwest::StatusCode;
use serde_json::{Value, json};

use flatstore_integration_tests::TestServer;

async fn get_json(server: &TestServer, path: &str) -> Value {
    server
        .client()
        .get(server.url(path))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON")
}

async fn place_order(server: &TestServer, body: &Value) -> reqwest::Response {
    server
        .client()
        .post(server.url("/api/orders"))
        .json(body)
        .send()
        .await
        .expect("Failed to place order")
}

fn product(products: &Value, id: i64) -> &Value {
    products
        .as_array()
        .and_then(|list| list.iter().find(|p| p["id"] == id))
        .expect("Product missing")
}

#[tokio::test]
async fn test_checkout_records_total_and_purchases() {
    let server = TestServer::start().await;

    let resp = place_order(
        &server,
        &json!({
            "userId": 7,
            "items": [{"productId": 1, "name": "Смартфон", "price": 75, "quantity": 2, "image": null}],
            "total": 150
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(order["id"], 1);
    assert_eq!(order["total"].as_f64(), Some(150.0));
    assert_eq!(order["status"], "completed");

    let products = get_json(&server, "/api/products").await;
    assert_eq!(product(&products, 1)["stats"]["purchased"], 2);
}

#[tokio::test]
async fn test_order_with_deleted_product_still_succeeds() {
    let server = TestServer::start().await;

    let resp = place_order(
        &server,
        &json!({
            "userId": 7,
            "items": [{"productId": 999, "name": "Ghost", "price": 10, "quantity": 1, "image": null}],
            "total": 10
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_orders_filtered_by_user() {
    let server = TestServer::start().await;

    for user_id in [1, 2, 1] {
        let resp = place_order(
            &server,
            &json!({
                "userId": user_id,
                "items": [{"productId": 2, "name": "Футболка", "price": 5000, "quantity": 1, "image": null}],
                "total": 5000
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let orders = get_json(&server, "/api/orders/user?userId=1").await;
    let ids: Vec<i64> = orders
        .as_array()
        .expect("Expected array")
        .iter()
        .filter_map(|order| order["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_missing_user_id_query_is_400() {
    let server = TestServer::start().await;

    let resp = server
        .client()
        .get(server.url("/api/orders/user"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_quantity_is_malformed() {
    let server = TestServer::start().await;

    let resp = place_order(
        &server,
        &json!({
            "userId": 1,
            "items": [{"productId": 1, "name": "Смартфон", "price": 10, "quantity": -1, "image": null}],
            "total": 10
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_orders_get_unique_ids() {
    let server = TestServer::start().await;

    let mut handles = Vec::new();
    for user_id in 0..10 {
        let client = server.client().clone();
        let url = server.url("/api/orders");
        handles.push(tokio::spawn(async move {
            let order: Value = client
                .post(url)
                .json(&json!({
                    "userId": user_id,
                    "items": [{"productId": 1, "name": "Смартфон", "price": 1, "quantity": 1, "image": null}],
                    "total": 1
                }))
                .send()
                .await
                .expect("Failed to place order")
                .json()
                .await
                .expect("Invalid JSON");
            order["id"].as_i64().expect("Order without id")
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.expect("Task panicked"));
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());

    let products = get_json(&server, "/api/products").await;
    assert_eq!(product(&products, 1)["stats"]["purchased"], 10);
}

#[tokio::test]
async fn test_stats_summarize_orders() {
    let server = TestServer::start().await;

    place_order(
        &server,
        &json!({
            "userId": 1,
            "items": [{"productId": 2, "name": "Футболка", "price": 5000, "quantity": 3, "image": null}],
            "total": 15000
        }),
    )
    .await;

    let stats = get_json(&server, "/api/stats").await;
    assert_eq!(stats["totalOrders"], 1);
    assert_eq!(stats["totalRevenue"].as_f64(), Some(15000.0));
    assert_eq!(stats["topProducts"][0]["id"], 2);
}

#[tokio::test]
async fn test_orders_are_written_to_the_data_directory() {
    let server = TestServer::start().await;

    place_order(
        &server,
        &json!({"userId": 1, "items": [], "total": 0}),
    )
    .await;

    let raw = std::fs::read_to_string(server.data_dir().join("orders.json"))
        .expect("Orders file missing");
    let file: Value = serde_json::from_str(&raw).expect("Invalid JSON on disk");
    assert_eq!(file["nextId"], 2);
    assert_eq!(file["records"][0]["userId"], 1);
}
