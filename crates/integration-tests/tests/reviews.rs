//! Integration tests for reviews and admin replies.

use reqwest::StatusCode;
use serde_json::{Value, json};

use flatstore_integration_tests::TestServer;

async fn list_reviews(server: &TestServer) -> Value {
    server
        .client()
        .get(server.url("/api/reviews"))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON")
}

#[tokio::test]
async fn test_submit_and_reply() {
    let server = TestServer::start().await;

    let resp = server
        .client()
        .post(server.url("/api/reviews"))
        .json(&json!({
            "userId": 2,
            "userName": "aigerim",
            "productId": 1,
            "text": "Отличный телефон",
            "rating": 5
        }))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let review: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(review["adminReply"], Value::Null);

    let resp = server
        .client()
        .put(server.url("/api/reviews/1"))
        .json(&json!({"adminReply": "Спасибо!"}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let reviews = list_reviews(&server).await;
    assert_eq!(reviews[0]["adminReply"], "Спасибо!");
}

#[tokio::test]
async fn test_reply_to_missing_review_leaves_collection_unchanged() {
    let server = TestServer::start().await;

    server
        .client()
        .post(server.url("/api/reviews"))
        .json(&json!({
            "userId": 2,
            "userName": "aigerim",
            "productId": 1,
            "text": "Хорошо",
            "rating": 4
        }))
        .send()
        .await
        .expect("Request failed");
    let before = list_reviews(&server).await;

    let resp = server
        .client()
        .put(server.url("/api/reviews/99"))
        .json(&json!({"adminReply": "?"}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(list_reviews(&server).await, before);
}
