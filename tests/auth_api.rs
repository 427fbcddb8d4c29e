use actix_web::{test, web, App};
use catalog_server::{configure, AppState, Settings};
use serde_json::json;

fn test_state() -> AppState {
    let config = Settings::new_for_test().expect("Failed to load test config");
    AppState::in_memory(config).expect("Failed to build in-memory state")
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(|cfg| configure(cfg, 1024 * 1024)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_register_and_login() {
    let state = test_state();
    let app = init_app!(state);

    // Test registration
    let register_response = test::TestRequest::post()
        .uri("/user")
        .set_json(json!({
            "username": "alice@example.com",
            "password": "hunter2pass"
        }))
        .send_request(&app)
        .await;

    assert_eq!(register_response.status(), 201);
    let register_body: serde_json::Value = test::read_body_json(register_response).await;
    assert!(register_body.get("id").is_some());
    assert!(register_body.get("password").is_none());

    // Test login
    let login_response = test::TestRequest::post()
        .uri("/user/login")
        .set_json(json!({
            "username": "alice@example.com",
            "password": "hunter2pass"
        }))
        .send_request(&app)
        .await;

    assert_eq!(login_response.status(), 200);
    let header = login_response
        .headers()
        .get("x-auth-token")
        .expect("token header")
        .to_str()
        .unwrap()
        .to_string();
    let token = header.strip_prefix("Bearer ").expect("Bearer prefix");

    let claims = state.auth_service.tokens().verify(token).unwrap();
    assert_eq!(claims.sub, "alice@example.com");

    let login_body: serde_json::Value = test::read_body_json(login_response).await;
    assert_eq!(login_body, json!({ "username": "alice@example.com" }));
}

#[actix_web::test]
async fn test_duplicate_registration() {
    let state = test_state();
    let app = init_app!(state);

    let first = test::TestRequest::post()
        .uri("/user")
        .set_json(json!({ "username": "alice@example.com", "password": "hunter2pass" }))
        .send_request(&app)
        .await;
    assert_eq!(first.status(), 201);

    let second = test::TestRequest::post()
        .uri("/user")
        .set_json(json!({ "username": "alice@example.com", "password": "different99" }))
        .send_request(&app)
        .await;
    assert_eq!(second.status(), 409);

    let body: serde_json::Value = test::read_body_json(second).await;
    assert_eq!(body["error"]["status"], 409);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("identifier already registered"));
}

#[actix_web::test]
async fn test_invalid_login_does_not_reveal_registration() {
    let state = test_state();
    let app = init_app!(state);

    test::TestRequest::post()
        .uri("/user")
        .set_json(json!({ "username": "alice@example.com", "password": "hunter2pass" }))
        .send_request(&app)
        .await;

    let wrong_password = test::TestRequest::post()
        .uri("/user/login")
        .set_json(json!({ "username": "alice@example.com", "password": "wrongpassword" }))
        .send_request(&app)
        .await;
    assert_eq!(wrong_password.status(), 401);
    assert!(wrong_password.headers().get("x-auth-token").is_none());
    let wrong_password: serde_json::Value = test::read_body_json(wrong_password).await;

    let unknown_user = test::TestRequest::post()
        .uri("/user/login")
        .set_json(json!({ "username": "bob@example.com", "password": "whatever1" }))
        .send_request(&app)
        .await;
    assert_eq!(unknown_user.status(), 401);
    let unknown_user: serde_json::Value = test::read_body_json(unknown_user).await;

    assert_eq!(wrong_password, unknown_user);
}

#[actix_web::test]
async fn test_invalid_registration() {
    let state = test_state();
    let app = init_app!(state);

    let short_password = test::TestRequest::post()
        .uri("/user")
        .set_json(json!({ "username": "x", "password": "short" }))
        .send_request(&app)
        .await;
    assert_eq!(short_password.status(), 400);

    let long_username = test::TestRequest::post()
        .uri("/user")
        .set_json(json!({ "username": "a".repeat(51), "password": "hunter2pass" }))
        .send_request(&app)
        .await;
    assert_eq!(long_username.status(), 400);

    let missing_password = test::TestRequest::post()
        .uri("/user")
        .set_json(json!({ "username": "alice@example.com" }))
        .send_request(&app)
        .await;
    assert_eq!(missing_password.status(), 400);
    let body: serde_json::Value = test::read_body_json(missing_password).await;
    assert_eq!(
        body["error"]["message"],
        "Validation error: Unable to parse the request payload"
    );
}
