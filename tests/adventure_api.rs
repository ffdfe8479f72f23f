use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use mongodb::bson::oid::ObjectId;
use serde_json::{Value, json};

use bagpack_backend::middleware::auth::create_token;
use bagpack_backend::state::AppState;
use bagpack_backend::user::directory::InMemoryUserDirectory;

const SECRET: &str = "adventure-test-secret";

fn bearer(user: &ObjectId) -> (&'static str, String) {
    let token = create_token(&user.to_hex(), SECRET, 1).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn adventures_are_private_to_their_owner() {
    let state = AppState::in_memory(Arc::new(InMemoryUserDirectory::new()), SECRET, 5);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let (owner, stranger) = (ObjectId::new(), ObjectId::new());

    let req = test::TestRequest::post()
        .uri("/adventures")
        .insert_header(bearer(&owner))
        .set_json(json!({ "destination": "Hanoi", "itinerary": { "text": "  " } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Validation Error: Itinerary is required");

    let req = test::TestRequest::post()
        .uri("/adventures")
        .insert_header(bearer(&owner))
        .set_json(json!({
            "destination": "Hanoi",
            "places": [{ "name": "Old Quarter" }],
            "itinerary": { "text": "Day 1: pho" },
            "options": { "days": 5 },
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["adventure"]["options"], json!({ "days": 5, "budget": 10000.0, "people": 2 }));
    let adventure_id = body["adventure"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/adventures")
        .insert_header(bearer(&owner))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);

    let req = test::TestRequest::get()
        .uri("/adventures")
        .insert_header(bearer(&stranger))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/adventures/{adventure_id}"))
        .insert_header(bearer(&stranger))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/adventures/{adventure_id}"))
        .insert_header(bearer(&stranger))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/adventures/{adventure_id}"))
        .insert_header(bearer(&owner))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["adventure"]["destination"], "Hanoi");
    assert_eq!(body["adventure"]["places"][0]["name"], "Old Quarter");
}
