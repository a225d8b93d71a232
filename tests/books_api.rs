use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookshelf_app::books::{routes::SharedCatalog, BooksModule};
use bookshelf_kernel::{settings::Settings, Module};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    catalog: SharedCatalog,
}

impl TestApp {
    fn new() -> Self {
        let module = BooksModule::new();
        Self {
            router: module.routes(),
            catalog: module.catalog(),
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn add(&self, body: Value) -> String {
        let (status, response) = self.request(Method::POST, "/books", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{response}");
        response["data"]["bookId"].as_str().unwrap().to_string()
    }

    async fn size(&self) -> usize {
        self.catalog.read().await.len()
    }
}

fn book(name: &str, page_count: u32, read_page: u32) -> Value {
    json!({
        "name": name,
        "year": 2010,
        "author": "John Doe",
        "summary": "Lorem ipsum dolor sit amet",
        "publisher": "Dicoding Indonesia",
        "pageCount": page_count,
        "readPage": read_page,
        "reading": false
    })
}

#[tokio::test]
async fn add_without_name_is_rejected() {
    let app = TestApp::new();

    let mut unnamed = book("", 100, 25);
    let (status, body) = app.request(Method::POST, "/books", Some(unnamed.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"status": "fail", "message": "Gagal menambahkan buku. Mohon isi nama buku"})
    );

    unnamed.as_object_mut().unwrap().remove("name");
    let (status, _) = app.request(Method::POST, "/books", Some(unnamed)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.size().await, 0);
}

#[tokio::test]
async fn add_with_read_page_past_page_count_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .request(Method::POST, "/books", Some(book("X", 100, 150)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );
    assert_eq!(app.size().await, 0);
}

#[tokio::test]
async fn add_returns_id_and_marks_finished() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/books",
            Some(json!({"name": "X", "pageCount": 100, "readPage": 100})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil ditambahkan");
    let id = body["data"]["bookId"].as_str().unwrap();
    assert!(!id.is_empty());

    let (_, fetched) = app.request(Method::GET, &format!("/books/{id}"), None).await;
    assert_eq!(fetched["data"]["book"]["finished"], true);
}

#[tokio::test]
async fn malformed_body_is_a_fail_response() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/books",
            Some(json!({"name": "X", "pageCount": "many"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());
    assert_eq!(app.size().await, 0);
}

#[tokio::test]
async fn null_fields_are_treated_as_missing() {
    let app = TestApp::new();
    let id = app
        .add(json!({
            "name": "A",
            "year": null,
            "author": null,
            "publisher": null,
            "reading": null
        }))
        .await;

    let (_, body) = app.request(Method::GET, &format!("/books/{id}"), None).await;
    let stored = &body["data"]["book"];
    assert_eq!(stored["year"], 0);
    assert_eq!(stored["author"], "");
    assert_eq!(stored["publisher"], "");
    assert_eq!(stored["reading"], false);
}

#[tokio::test]
async fn read_page_without_page_count_is_accepted() {
    let app = TestApp::new();
    let id = app.add(json!({"name": "A", "readPage": 5})).await;

    let (_, body) = app.request(Method::GET, &format!("/books/{id}"), None).await;
    let stored = &body["data"]["book"];
    assert_eq!(stored["readPage"], 5);
    assert_eq!(stored["pageCount"], Value::Null);
    assert_eq!(stored["finished"], false);

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/books/{id}"),
            Some(json!({"name": "A", "pageCount": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn body_without_content_type_is_parsed_as_json() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .body(Body::from(r#"{"name": "Tanpa Header", "pageCount": 10}"#))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.size().await, 1);
}

#[tokio::test]
async fn round_trip_preserves_submitted_fields() {
    let app = TestApp::new();
    let submitted = json!({
        "name": "Buku A",
        "year": 2021,
        "author": "Jane",
        "summary": "Ringkasan",
        "publisher": "Gramedia",
        "pageCount": 320,
        "readPage": 40,
        "reading": true
    });
    let id = app.add(submitted.clone()).await;

    let (status, body) = app.request(Method::GET, &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let stored = body["data"]["book"].as_object().unwrap();
    for (field, value) in submitted.as_object().unwrap() {
        assert_eq!(&stored[field], value, "field {field}");
    }
    assert_eq!(stored["id"], id.as_str());
    assert_eq!(stored["finished"], false);
    assert!(stored["insertedAt"].is_string());
    assert_eq!(stored["insertedAt"], stored["updatedAt"]);
}

#[tokio::test]
async fn list_projects_and_filters() {
    let app = TestApp::new();
    let mut reading = book("The ABC Murders", 250, 30);
    reading["reading"] = json!(true);
    let first = app.add(reading).await;
    let second = app.add(book("Dune", 400, 400)).await;
    let third = app.add(book("abcdarium", 50, 50)).await;

    let (status, body) = app.request(Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let books = body["data"]["books"].as_array().unwrap();
    let ids: Vec<_> = books.iter().map(|b| b["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str(), third.as_str()]);
    for entry in books {
        let mut keys: Vec<_> = entry.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["id", "name", "publisher"]);
    }

    let (_, body) = app.request(Method::GET, "/books?name=abc", None).await;
    let names: Vec<_> = body["data"]["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["The ABC Murders", "abcdarium"]);

    let (_, body) = app.request(Method::GET, "/books?reading=1", None).await;
    assert_eq!(
        body["data"]["books"],
        json!([{"id": first, "name": "The ABC Murders", "publisher": "Dicoding Indonesia"}])
    );

    let (_, body) = app.request(Method::GET, "/books?finished=1", None).await;
    assert_eq!(body["data"]["books"].as_array().unwrap().len(), 2);

    let (_, body) = app
        .request(Method::GET, "/books?name=ABC&finished=0", None)
        .await;
    assert_eq!(body["data"]["books"][0]["id"], first.as_str());
    assert_eq!(body["data"]["books"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn fetch_unknown_id_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/books/xxxxx", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"status": "fail", "message": "Buku tidak ditemukan"})
    );
}

#[tokio::test]
async fn update_validates_and_replaces() {
    let app = TestApp::new();
    let id = app.add(book("Draft", 100, 10)).await;
    let uri = format!("/books/{id}");

    let (status, body) = app
        .request(Method::PUT, "/books/unknown", Some(book("Y", 10, 1)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Gagal memperbarui buku. Id tidak ditemukan");

    let mut unnamed = book("Y", 10, 1);
    unnamed.as_object_mut().unwrap().remove("name");
    let (status, body) = app.request(Method::PUT, &uri, Some(unnamed)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Gagal memperbarui buku. Mohon isi nama buku");

    let (status, body) = app
        .request(Method::PUT, &uri, Some(book("Y", 10, 11)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
    );

    let (_, before) = app.request(Method::GET, &uri, None).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    let (status, body) = app
        .request(Method::PUT, &uri, Some(book("Final", 120, 120)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "success", "message": "Buku berhasil diperbarui"})
    );

    let (_, after) = app.request(Method::GET, &uri, None).await;
    let (before, after) = (&before["data"]["book"], &after["data"]["book"]);
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["insertedAt"], before["insertedAt"]);
    assert_ne!(after["updatedAt"], before["updatedAt"]);
    assert_eq!(after["name"], "Final");
    assert_eq!(after["finished"], true);
    assert!(after["readPage"].as_u64() <= after["pageCount"].as_u64());
}

#[tokio::test]
async fn delete_removes_exactly_one_book() {
    let app = TestApp::new();
    let keep = app.add(book("Keep", 10, 0)).await;
    let gone = app.add(book("Drop", 10, 0)).await;
    let uri = format!("/books/{gone}");

    let (status, body) = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "success", "message": "Buku berhasil dihapus"})
    );
    assert_eq!(app.size().await, 1);

    let (_, body) = app.request(Method::GET, "/books", None).await;
    assert_eq!(body["data"]["books"][0]["id"], keep.as_str());

    let (status, body) = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Buku gagal dihapus. Id tidak ditemukan");
}

#[tokio::test]
async fn full_server_router_serves_books() {
    let registry = bookshelf_app::bootstrap::registry();
    let app = bookshelf_http::build_router(&registry, &Settings::default());

    let response = app
        .oneshot(Request::get("/books").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "success", "data": {"books": []}}));
}
