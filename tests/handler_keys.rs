mod common;

use axum_test::TestServer;
use std::collections::HashSet;

#[tokio::test]
async fn test_keys_empty_store() {
    let state = common::create_test_state(Some(common::BASE_URL));
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/keys").await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/json");

    let keys = response.json::<Vec<String>>();
    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_keys_lists_every_created_key() {
    let state = common::create_test_state(Some(common::BASE_URL));
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let mut created = HashSet::new();
    for i in 0..10 {
        let short_url = server
            .post("/shorten")
            .add_query_param("originalUrl", format!("https://example.com/{i}"))
            .await
            .text();
        created.insert(common::short_key_of(&short_url).to_string());
    }

    let response = server.get("/keys").await;
    response.assert_status_ok();

    let keys = response.json::<Vec<String>>();
    assert_eq!(keys.len(), 10);

    let listed: HashSet<String> = keys.into_iter().collect();
    assert_eq!(listed, created);
}

#[tokio::test]
async fn test_keys_are_well_formed() {
    let state = common::create_test_state(Some(common::BASE_URL));
    for i in 0..5 {
        state
            .link_service
            .create(format!("https://example.com/{i}"))
            .await
            .unwrap();
    }

    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let keys = server.get("/keys").await.json::<Vec<String>>();

    assert_eq!(keys.len(), 5);
    for key in keys {
        assert_eq!(key.len(), 8);
        assert!(common::is_url_safe(&key));
    }
}
