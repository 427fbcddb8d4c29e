use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{test, web, App};
use catalog_server::{configure, AppState, Settings};
use serde_json::{json, Value};

macro_rules! init_app {
    () => {{
        let config = Settings::new_for_test().expect("Failed to load test config");
        let state = AppState::in_memory(config).expect("in-memory state");
        test::init_service(
            App::new()
                .wrap(NormalizePath::new(TrailingSlash::Trim))
                .app_data(web::Data::new(state))
                .configure(|cfg| configure(cfg, 1024 * 1024)),
        )
        .await
    }};
}

fn pencil() -> Value {
    json!({
        "product_name": "Pencil",
        "price": 10,
        "currency": "nzd",
        "discount": 2,
        "vendor": "test",
        "accessories": ["test"],
        "is_essential": false
    })
}

#[actix_web::test]
async fn test_product_crud() {
    let app = init_app!();

    // Create
    let resp = test::TestRequest::post()
        .uri("/products")
        .set_json(json!([pencil()]))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 201);
    let ids: Vec<String> = test::read_body_json(resp).await;
    assert_eq!(ids.len(), 1);
    let id = &ids[0];

    // Read one
    let resp = test::TestRequest::get()
        .uri(&format!("/products/{}", id))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let product: Value = test::read_body_json(resp).await;
    assert_eq!(product["_id"], id.as_str());
    assert_eq!(product["product_name"], "Pencil");
    assert_eq!(product["accessories"], json!(["test"]));

    // Update
    let mut changed = pencil();
    changed["price"] = json!(15);
    changed["accessories"] = json!([]);
    let resp = test::TestRequest::put()
        .uri(&format!("/products/{}", id))
        .set_json(&changed)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["_id"], id.as_str());
    assert_eq!(updated["price"], 15);
    assert!(updated.get("accessories").is_none());

    // List, with a trailing slash
    let resp = test::TestRequest::get()
        .uri("/products/")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let all: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["price"], 15);

    // Delete
    let resp = test::TestRequest::delete()
        .uri(&format!("/products/{}", id))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);

    let resp = test::TestRequest::get()
        .uri(&format!("/products/{}", id))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_create_rejects_whole_batch_on_invalid_item() {
    let app = init_app!();

    let mut invalid = pencil();
    invalid["currency"] = json!("dollars");
    let resp = test::TestRequest::post()
        .uri("/products")
        .set_json(json!([pencil(), invalid]))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 400);

    let resp = test::TestRequest::get()
        .uri("/products")
        .send_request(&app)
        .await;
    let all: Vec<Value> = test::read_body_json(resp).await;
    assert!(all.is_empty());
}

#[actix_web::test]
async fn test_unknown_and_malformed_ids() {
    let app = init_app!();

    let resp = test::TestRequest::get()
        .uri("/products/615915766aab9e4f3bb138eb")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 400);

    let missing = uuid::Uuid::new_v4();
    let resp = test::TestRequest::put()
        .uri(&format!("/products/{}", missing))
        .set_json(pencil())
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 404);

    let resp = test::TestRequest::delete()
        .uri(&format!("/products/{}", missing))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_oversized_body_is_rejected_with_413() {
    let app = init_app!();

    let body = format!("[{{\"product_name\": \"{}\"}}]", "a".repeat(1024 * 1024));
    let resp = test::TestRequest::post()
        .uri("/products")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 413);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["status"], 413);

    // Malformed JSON under the limit is still a 400
    let resp = test::TestRequest::post()
        .uri("/products")
        .insert_header(("content-type", "application/json"))
        .set_payload("[{")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 400);
}
