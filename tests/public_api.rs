mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create, get, ids, login, memory_app, sample_app, send};

#[tokio::test]
async fn without_a_store_books_come_from_the_sample_set() {
    let app = sample_app();

    let all = get(&app, "/books").await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(ids(&all.body), vec!["1", "2", "3"]);

    let none = get(&app, "/books?q=zoology").await;
    assert_eq!(none.status, StatusCode::OK);
    assert_eq!(none.body, json!([]));

    let by_author = get(&app, "/books?q=ALOK").await;
    assert_eq!(ids(&by_author.body), vec!["3"]);

    let by_category = get(&app, "/books?category=Vocational%20Courses").await;
    assert_eq!(ids(&by_category.body), vec!["2"]);
}

#[tokio::test]
async fn without_a_store_other_reads_fall_back_too() {
    let app = sample_app();

    let book = get(&app, "/books/1").await;
    assert_eq!(book.status, StatusCode::OK);
    assert_eq!(book.body["title"], "Mathematics-1");
    assert_eq!(get(&app, "/books/9").await.status, StatusCode::NOT_FOUND);

    let categories = get(&app, "/categories").await;
    assert_eq!(categories.body.as_array().unwrap().len(), 3);

    let carousel = get(&app, "/carousel").await;
    assert_eq!(carousel.body[0]["title"], "Sample Poster");

    let settings = get(&app, "/settings").await;
    assert_eq!(settings.status, StatusCode::OK);
    assert_eq!(settings.body["key"], "home");
    assert_eq!(settings.body["title"], "WELCOME TO STUDY-HUB PUBLICATION");
}

#[tokio::test]
async fn without_a_store_writes_fail() {
    let app = sample_app();

    let contact = send(
        &app,
        "POST",
        "/contact",
        None,
        Some(json!({"name": "Ann", "phone": "555"})),
    )
    .await;
    assert_eq!(contact.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(contact.body["error"]["code"], "store_unavailable");

    let token = login(&app).await;
    let create = send(
        &app,
        "POST",
        "/admin/books",
        Some(&token),
        Some(json!({"title": "Optics", "author": "Ray"})),
    )
    .await;
    assert_eq!(create.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn public_book_reads_use_the_store_when_present() {
    let app = memory_app();
    let token = login(&app).await;

    let older = create(&app, &token, "/admin/books", json!({"title": "Optics", "author": "Ray", "category": "Physics"})).await;
    let newer = create(&app, &token, "/admin/books", json!({"title": "Waves", "author": "Crest", "isbn": "ISBN-77"})).await;

    let listed = get(&app, "/books").await;
    assert_eq!(
        ids(&listed.body),
        vec![newer["_id"].as_str().unwrap(), older["_id"].as_str().unwrap()]
    );

    let searched = get(&app, "/books?q=isbn-7").await;
    assert_eq!(ids(&searched.body), vec![newer["_id"].as_str().unwrap()]);

    let filtered = get(&app, "/books?category=Physics&q=opt").await;
    assert_eq!(ids(&filtered.body), vec![older["_id"].as_str().unwrap()]);

    // Regex metacharacters are literal.
    assert_eq!(get(&app, "/books?q=.*").await.body, json!([]));

    // Sample ids mean nothing once a store is configured.
    assert_eq!(get(&app, "/books/1").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_book_reads_back_unchanged() {
    let app = memory_app();
    let token = login(&app).await;

    let input = json!({
        "title": "Mathematics-2",
        "author": "Konch, De & Paul",
        "isbn": "ISBN-2001",
        "category": "Polytechnic Courses",
        "frontCover": "https://cdn.test/m2-front.jpg",
        "backCover": "https://cdn.test/m2-back.jpg",
        "description": "Second semester."
    });
    let created = create(&app, &token, "/admin/books", input.clone()).await;
    let id = created["_id"].as_str().unwrap();
    assert_eq!(id.len(), 24);
    assert!(created["createdAt"].is_string());

    let fetched = get(&app, &format!("/books/{}", id)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    for (field, value) in input.as_object().unwrap() {
        assert_eq!(&fetched.body[field], value, "field {}", field);
    }
}

#[tokio::test]
async fn public_carousel_hides_inactive_and_sorts() {
    let app = memory_app();
    let token = login(&app).await;

    let late = create(&app, &token, "/admin/carousel", json!({"imageUrl": "/c.png", "order": 2})).await;
    let first_tie = create(&app, &token, "/admin/carousel", json!({"imageUrl": "/a.png", "order": 1})).await;
    let second_tie = create(&app, &token, "/admin/carousel", json!({"imageUrl": "/b.png", "order": 1})).await;
    create(&app, &token, "/admin/carousel", json!({"imageUrl": "/hidden.png", "order": 0, "active": false})).await;

    let listed = get(&app, "/carousel").await;
    assert_eq!(listed.status, StatusCode::OK);
    assert!(listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["active"] == json!(true)));
    assert_eq!(
        ids(&listed.body),
        vec![
            second_tie["_id"].as_str().unwrap(),
            first_tie["_id"].as_str().unwrap(),
            late["_id"].as_str().unwrap(),
        ]
    );

    let admin = send(&app, "GET", "/admin/carousel", Some(&token), None).await;
    assert_eq!(admin.body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn settings_are_created_once_with_defaults() {
    let app = memory_app();

    let first = get(&app, "/settings").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["key"], "home");
    assert!(first.body["description"]
        .as_str()
        .unwrap()
        .starts_with("We have the biggest bestsellers"));

    let second = get(&app, "/settings").await;
    assert_eq!(second.body["_id"], first.body["_id"]);
}

#[tokio::test]
async fn contact_form_validates_and_stores() {
    let app = memory_app();

    let missing = send(&app, "POST", "/contact", None, Some(json!({"name": "Ann"}))).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"]["code"], "validation_error");

    let accepted = send(
        &app,
        "POST",
        "/contact",
        None,
        Some(json!({"name": "Ann", "phone": "555"})),
    )
    .await;
    assert_eq!(accepted.status, StatusCode::CREATED);
    assert_eq!(accepted.body["ok"], true);
    assert!(accepted.body["id"].is_string());
}

#[tokio::test]
async fn routing_edges_use_the_error_body() {
    let app = memory_app();

    let wrong_method = send(&app, "DELETE", "/books", None, None).await;
    assert_eq!(wrong_method.status, StatusCode::METHOD_NOT_ALLOWED);

    let unknown = get(&app, "/nowhere").await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body["error"]["code"], "not_found");

    let bad_json = axum::http::Request::builder()
        .method("POST")
        .uri("/contact")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let reply = common::send_raw(&app, bad_json).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn health_and_docs_are_served() {
    let app = memory_app();

    let health = get(&app, "/healthz").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, json!("ok"));

    let docs = get(&app, "/docs/openapi.json").await;
    assert_eq!(docs.status, StatusCode::OK);
    assert!(docs.body["paths"]["/books"].is_object());
    assert!(docs.body["paths"]["/admin/upload"].is_object());
    assert!(docs.body["components"]["schemas"]["ErrorResponse"].is_object());
}
