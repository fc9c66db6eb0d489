mod common;

use actix_web::{
    App,
    http::StatusCode,
    middleware::NormalizePath,
    test::{self, TestRequest},
};
use serde_json::{Value, json};

use aidhub::{
    api::middleware::{REQUEST_ID_HEADER, RequestId},
    database::types::SystemRole,
};
use common::{app_config, authed, create_user, find_facility, plan_id, test_state};

#[actix_web::test]
async fn requests_without_cookies_are_unauthorized() {
    let state = test_state().await;
    let app = test::init_service(App::new().configure(app_config(state))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/api/my-subscriptions").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[actix_web::test]
async fn responses_carry_request_id_and_envelope() {
    let state = test_state().await;
    let director = create_user(&state.db, "director@example.com", SystemRole::Director).await;
    let app = test::init_service(
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(RequestId)
            .configure(app_config(state)),
    )
    .await;

    let req = authed(TestRequest::get().uri("/api/subscription-plans/"), &director).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Subscription plans retrieved successfully.");
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("plans array")
        .iter()
        .filter_map(|p| p["plan_name"].as_str())
        .collect();
    assert_eq!(names, vec!["Basic", "Free", "Premium"]);
}

#[actix_web::test]
async fn subscribe_flow_enforces_single_pending() {
    let state = test_state().await;
    let db = state.db.clone();
    let director = create_user(&db, "director@example.com", SystemRole::Director).await;
    let basic = plan_id(&db, "Basic").await;
    let premium = plan_id(&db, "Premium").await;
    let app = test::init_service(App::new().configure(app_config(state))).await;

    // plan_id отсутствует
    let req = authed(TestRequest::post().uri("/api/subscribe"), &director)
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["plan_id"].is_array());

    let req = authed(TestRequest::post().uri("/api/subscribe"), &director)
        .set_json(json!({ "plan_id": basic }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "Active");
    assert!(body["message"].as_str().unwrap_or_default().contains("₱499.00"));

    let req = authed(TestRequest::post().uri("/api/subscribe"), &director)
        .set_json(json!({ "plan_id": premium }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "Pending");

    let req = authed(TestRequest::post().uri("/api/subscribe"), &director)
        .set_json(json!({ "plan_id": premium }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "PENDING_ALREADY_EXISTS");

    let req = authed(TestRequest::get().uri("/api/subscription-transactions"), &director).to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let rows = body["data"].as_array().expect("ledger rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["new_plan_id"], premium);
    assert_eq!(rows[0]["old_plan_id"], basic);
    assert_eq!(rows[1]["old_plan_id"], Value::Null);

    let req = authed(TestRequest::delete().uri("/api/cancel-pending-subscription"), &director).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = authed(TestRequest::delete().uri("/api/cancel-pending-subscription"), &director).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NO_PENDING_SUBSCRIPTION");
}

#[actix_web::test]
async fn free_plan_cannot_be_subscribed_directly() {
    let state = test_state().await;
    let director = create_user(&state.db, "director@example.com", SystemRole::Director).await;
    let free = plan_id(&state.db, "Free").await;
    let app = test::init_service(App::new().configure(app_config(state))).await;

    let req = authed(TestRequest::post().uri("/api/subscribe"), &director)
        .set_json(json!({ "plan_id": free }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "FREE_PLAN_FORBIDDEN");
}

#[actix_web::test]
async fn facility_approval_gates_beneficiary_enrollment() {
    let state = test_state().await;
    let db = state.db.clone();
    let admin = create_user(&db, "admin@example.com", SystemRole::Admin).await;
    let director = create_user(&db, "director@example.com", SystemRole::Director).await;
    let app = test::init_service(App::new().configure(app_config(state))).await;

    let req = authed(TestRequest::post().uri("/api/financial-aid"), &director)
        .set_json(json!({
            "center_name": "Bayanihan Scholarship Center",
            "latitude": 14.5995,
            "longitude": 120.9842,
            "documents": [{ "type": "business_permit", "path": "financial-aid-documents/permit.pdf" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["isManagable"], false);
    assert_eq!(body["data"]["documents"].as_array().map(Vec::len), Some(1));

    let beneficiary = json!({
        "firstname": "Jose",
        "lastname": "Rizal",
        "email": "jose@example.com",
        "password": "scholar-2025",
        "password_confirmation": "scholar-2025",
        "age": 19,
        "enrolled_school": "University of the Philippines",
        "school_year": "2025-2026"
    });
    let req = authed(TestRequest::post().uri("/api/beneficiaries"), &director)
        .set_json(beneficiary.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "FACILITY_NOT_APPROVED");

    let facility = find_facility(&db, director.id).await.expect("facility registered");
    let status_uri = format!("/api/financial-aid/{}/status", facility.id);

    let req = authed(TestRequest::patch().uri(&status_uri), &director)
        .set_json(json!({ "isManagable": true }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = authed(TestRequest::patch().uri(&status_uri), &admin)
        .set_json(json!({ "isManagable": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Facility has been approved");

    let req = authed(TestRequest::post().uri("/api/beneficiaries"), &director)
        .set_json(beneficiary)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["financial_aid_id"], facility.id);
    assert!(body["data"].get("password").is_none());

    let req = authed(TestRequest::get().uri("/api/beneficiaries?per_page=5"), &director).to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["per_page"], 5);
}

#[actix_web::test]
async fn beneficiaries_require_a_facility() {
    let state = test_state().await;
    let employee = create_user(&state.db, "employee@example.com", SystemRole::Employee).await;
    let app = test::init_service(App::new().configure(app_config(state))).await;

    let req = authed(TestRequest::get().uri("/api/beneficiaries"), &employee).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NO_FACILITY");
}

#[actix_web::test]
async fn plan_mutations_are_admin_only() {
    let state = test_state().await;
    let admin = create_user(&state.db, "admin@example.com", SystemRole::Admin).await;
    let director = create_user(&state.db, "director@example.com", SystemRole::Director).await;
    let app = test::init_service(App::new().configure(app_config(state))).await;

    let plan = json!({ "plan_name": "Gold", "price": 2999, "duration_in_months": 36 });

    let req = authed(TestRequest::post().uri("/api/subscription-plans"), &director)
        .set_json(plan.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = authed(TestRequest::post().uri("/api/subscription-plans"), &admin)
        .set_json(plan.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = authed(TestRequest::post().uri("/api/subscription-plans"), &admin)
        .set_json(json!({ "plan_name": "gold", "price": 1, "duration_in_months": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "DUPLICATE_PLAN_NAME");
}

#[actix_web::test]
async fn malformed_json_uses_error_envelope() {
    let state = test_state().await;
    let director = create_user(&state.db, "director@example.com", SystemRole::Director).await;
    let app = test::init_service(App::new().configure(app_config(state))).await;

    let req = authed(TestRequest::post().uri("/api/subscribe"), &director)
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[actix_web::test]
async fn public_registration_refuses_admin_role() {
    let state = test_state().await;
    let app = test::init_service(App::new().configure(app_config(state))).await;

    let req = TestRequest::post()
        .uri("/api/register")
        .set_json(json!({
            "firstname": "Maria",
            "lastname": "Santos",
            "email": "maria@example.com",
            "password": "secret-password",
            "password_confirmation": "secret-password",
            "systemrole_id": 1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["systemrole_id"].is_array());
}

#[actix_web::test]
async fn wrong_field_types_are_validation_errors() {
    let state = test_state().await;
    let admin = create_user(&state.db, "admin@example.com", SystemRole::Admin).await;
    let app = test::init_service(App::new().configure(app_config(state))).await;

    let req = authed(TestRequest::post().uri("/api/subscribe"), &admin)
        .set_json(json!({ "plan_id": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["errors"]["plan_id"].is_array());
    assert!(!body["message"].as_str().unwrap_or_default().contains("expected i32"));

    let req = authed(TestRequest::post().uri("/api/subscription-plans"), &admin)
        .set_json(json!({ "plan_name": "Gold", "price": "cheap", "duration_in_months": 12 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["price"].is_array());

    let req = authed(TestRequest::post().uri("/api/financial-aid"), &admin)
        .set_json(json!({
            "center_name": "Center",
            "documents": [{ "type": 5, "path": "permit.pdf" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["documents.0.type"].is_array());
}
