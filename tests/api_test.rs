///! End-to-end tests of the JSON API against an in-memory SQLite database.
///!
///! Every test builds the full actix app with migrations applied, the cache
///! disabled and a fixed session secret.
///!
///! Run with: `cargo test --test api_test`
use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::from_fn;
use actix_web::{App, HttpResponse, test, web};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{Value, json};
use std::sync::Arc;

use siteadmin_backend::auth::identity::IdentityService;
use siteadmin_backend::auth::jwt::SessionKeys;
use siteadmin_backend::auth::middleware::{SESSION_COOKIE, require_admin_page};
use siteadmin_backend::cache::RedisCache;
use siteadmin_backend::config::AuthConfig;
use siteadmin_backend::configure_api;
use siteadmin_backend::db::is_unique_violation;
use siteadmin_backend::db::users as user_db;
use siteadmin_backend::models::users::{CreateUserFromAuth, Role};

const TEST_SECRET: &str = "api-test-secret-0123456789abcdef0123456789";
const ADMIN_EMAIL: &str = "admin@example.com";

async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Migrations failed");
    db
}

macro_rules! test_app {
    ($db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($db.clone()))
                .app_data(web::Data::new(Arc::new(RedisCache::disabled())))
                .app_data(web::Data::new(Arc::new(IdentityService::new(
                    &AuthConfig::new(&[ADMIN_EMAIL], &["crew.example.com"], TEST_SECRET),
                ))))
                .configure(configure_api)
                .service(
                    web::scope("/admin")
                        .wrap(from_fn(require_admin_page))
                        .route("", web::get().to(|| async { HttpResponse::Ok().body("admin home") })),
                ),
        )
        .await
    };
}

/// Create (or fetch) an account and mint a session token for it.
async fn token_for(db: &DatabaseConnection, email: &str, role: Role) -> (uuid::Uuid, String) {
    let user = user_db::find_or_create_from_auth(
        db,
        CreateUserFromAuth {
            email: email.to_string(),
            name: Some("Test User".to_string()),
            image: None,
            role,
        },
    )
    .await
    .expect("Failed to create user");
    let token = SessionKeys::new(TEST_SECRET, 1)
        .issue(&user)
        .expect("Failed to issue token")
        .token;
    (user.id, token)
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

fn contact_form(consent: Option<&'static str>) -> Vec<(&'static str, &'static str)> {
    let mut form = vec![
        ("firstName", "Ana"),
        ("lastName", "Diaz"),
        ("email", "ana@example.com"),
        ("phone", "555-0101"),
        ("service", "Plumbing"),
        ("message", "The kitchen tap is leaking."),
    ];
    if let Some(value) = consent {
        form.push(("consent", value));
    }
    form
}

#[actix_web::test]
async fn test_health_is_public() {
    let db = setup_db().await;
    let app = test_app!(db);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[actix_web::test]
async fn test_admin_routes_require_a_session() {
    let db = setup_db().await;
    let app = test_app!(db);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/customers").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Authentication required");

    let req = test::TestRequest::get()
        .uri("/api/customers")
        .insert_header(bearer("not-a-token"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_non_admin_is_forbidden() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, "viewer@example.com", Role::User).await;

    let req = test::TestRequest::get()
        .uri("/api/forms")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_credentials_sign_in() {
    let db = setup_db().await;
    let app = test_app!(db);

    let req = test::TestRequest::post()
        .uri("/api/auth/signin/credentials")
        .set_json(json!({"email": "Admin@Example.com", "password": "long-enough"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.response()
            .cookies()
            .any(|c| c.name() == "session-token" && c.http_only() == Some(true))
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["user"]["role"], "ADMIN");
    let token = body["token"].as_str().unwrap().to_string();

    // The issued token opens the admin API.
    let req = test::TestRequest::get()
        .uri("/api/auth/session")
        .insert_header(bearer(&token))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session["user"]["email"], ADMIN_EMAIL);

    for (email, password) in [
        ("stranger@example.com", "long-enough"),
        (ADMIN_EMAIL, "short"),
        ("not-an-email", "long-enough"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/signin/credentials")
            .set_json(json!({"email": email, "password": password}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[actix_web::test]
async fn test_settings_upsert_creates_then_updates() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let req = test::TestRequest::post()
        .uri("/api/settings")
        .insert_header(bearer(&token))
        .set_json(json!({"key": "theme", "value": "dark", "isPublic": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["value"], "dark");

    let req = test::TestRequest::post()
        .uri("/api/settings")
        .insert_header(bearer(&token))
        .set_json(json!({"key": "theme", "value": "light"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["value"], "light");
    assert_eq!(updated["isPublic"], true);

    let public: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/public/settings").to_request(),
    )
    .await;
    assert_eq!(public, json!({"theme": "light"}));

    let req = test::TestRequest::post()
        .uri("/api/settings")
        .insert_header(bearer(&token))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing required fields: key, value");
}

#[actix_web::test]
async fn test_testimonials_get_next_display_order() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let mut orders = Vec::new();
    for name in ["First", "Second"] {
        let req = test::TestRequest::post()
            .uri("/api/content/testimonials")
            .insert_header(bearer(&token))
            .set_json(json!({"customerName": name, "testimonialText": "Great work"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["rating"], 5);
        assert_eq!(body["isVisible"], true);
        assert_eq!(body["isFeatured"], false);
        orders.push(body["displayOrder"].as_i64().unwrap());
    }
    assert_eq!(orders, vec![1, 2]);

    let req = test::TestRequest::post()
        .uri("/api/content/testimonials")
        .insert_header(bearer(&token))
        .set_json(json!({"rating": 4}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Missing required fields: customerName, testimonialText"
    );
}

#[actix_web::test]
async fn test_reorder_is_all_or_nothing() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let req = test::TestRequest::post()
        .uri("/api/content/testimonials")
        .insert_header(bearer(&token))
        .set_json(json!({"customerName": "Only", "testimonialText": "Fine"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    // One unknown id: nothing changes.
    let req = test::TestRequest::put()
        .uri("/api/content/testimonials/reorder")
        .insert_header(bearer(&token))
        .set_json(json!({"testimonials": [
            {"id": id, "displayOrder": 10},
            {"id": uuid::Uuid::new_v4(), "displayOrder": 11},
        ]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["results"][0]["success"], true);
    assert_eq!(body["results"][1]["success"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/content/testimonials/{id}"))
        .insert_header(bearer(&token))
        .to_request();
    let unchanged: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unchanged["displayOrder"], 1);

    // Bare array form, all ids valid.
    let req = test::TestRequest::put()
        .uri("/api/content/testimonials/reorder")
        .insert_header(bearer(&token))
        .set_json(json!([{"id": id, "displayOrder": 7}]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["updated"], 1);
}

#[actix_web::test]
async fn test_pagination_counts_every_match() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    for i in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/customers")
            .insert_header(bearer(&token))
            .set_json(json!({
                "firstName": format!("Customer{i}"),
                "lastName": "Test",
                "email": format!("c{i}@example.com"),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["customerType"], "RESIDENTIAL");
        assert_eq!(body["isActive"], true);
    }

    let req = test::TestRequest::get()
        .uri("/api/customers?page=1&limit=2")
        .insert_header(bearer(&token))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["customers"].as_array().unwrap().len(), 2);
    assert_eq!(first["pagination"]["total"], 3);
    assert_eq!(first["pagination"]["pages"], 2);

    let req = test::TestRequest::get()
        .uri("/api/customers?page=2&limit=2")
        .insert_header(bearer(&token))
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second["customers"].as_array().unwrap().len(), 1);
    assert_eq!(second["pagination"]["total"], 3);
}

#[actix_web::test]
async fn test_contact_intake_and_response_flow() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (admin_id, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    // Without consent nothing is stored.
    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_form(contact_form(None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_form(contact_form(Some("on")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    let req = test::TestRequest::get()
        .uri("/api/forms")
        .insert_header(bearer(&token))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["pagination"]["total"], 1);
    let submission = &list["submissions"][0];
    assert_eq!(submission["status"], "NEW");
    assert_eq!(submission["priority"], "MEDIUM");
    assert_eq!(submission["type"], "SERVICE_INQUIRY");
    assert_eq!(submission["tags"], json!(["Plumbing", "website"]));
    let form_id = submission["id"].as_str().unwrap().to_string();

    // Responding is additive and marks the submission RESPONDED.
    for content in ["We will call you today.", "Technician booked for 3pm."] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/forms/{form_id}/respond"))
            .insert_header(bearer(&token))
            .set_json(json!({"content": content, "method": "EMAIL"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["responderId"], admin_id.to_string());
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/forms/{form_id}"))
        .insert_header(bearer(&token))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["status"], "RESPONDED");
    assert_eq!(detail["responses"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/forms/stats")
        .insert_header(bearer(&token))
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["byStatus"]["RESPONDED"], 1);
    assert_eq!(stats["byStatus"]["ARCHIVED"], 0);

    let req = test::TestRequest::post()
        .uri(&format!("/api/forms/{}/respond", uuid::Uuid::new_v4()))
        .insert_header(bearer(&token))
        .set_json(json!({"content": "Hello", "method": "PHONE"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_bulk_update_rolls_back_on_unknown_id() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_form(contact_form(Some("true")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/forms")
        .insert_header(bearer(&token))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let form_id = list["submissions"][0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri("/api/forms/bulk")
        .insert_header(bearer(&token))
        .set_json(json!({
            "ids": [form_id, uuid::Uuid::new_v4()],
            "updates": {"status": "ARCHIVED"},
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/forms/{form_id}"))
        .insert_header(bearer(&token))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["status"], "NEW");

    let req = test::TestRequest::patch()
        .uri("/api/forms/bulk")
        .insert_header(bearer(&token))
        .set_json(json!({"ids": [form_id], "updates": {"priority": "HIGH"}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["updated"], 1);
}

#[actix_web::test]
async fn test_business_info_is_a_single_row() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let req = test::TestRequest::get()
        .uri("/api/business-info")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    for name in ["Acme Plumbing", "Acme Plumbing & Heating"] {
        let req = test::TestRequest::post()
            .uri("/api/business-info")
            .insert_header(bearer(&token))
            .set_json(json!({
                "companyName": name,
                "email": "office@acme.example",
                "phone": "555-0100",
                "services": ["Repairs"],
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["companyName"], name);
    }

    let public: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/public/business-info").to_request(),
    )
    .await;
    assert_eq!(public["companyName"], "Acme Plumbing & Heating");
    assert_eq!(public["updatedBy"], ADMIN_EMAIL);
}

#[actix_web::test]
async fn test_users_cannot_deactivate_themselves() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (admin_id, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;
    let (other_id, other_token) = token_for(&db, "tech@crew.example.com", Role::Admin).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{admin_id}"))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{other_id}"))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["isActive"], false);

    // A deactivated account's session stops working.
    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(bearer(&other_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_pages_upsert_and_public_read() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let mut statuses = Vec::new();
    for title in ["About", "About Us"] {
        let req = test::TestRequest::put()
            .uri("/api/content/pages/about")
            .insert_header(bearer(&token))
            .set_json(json!({"title": title, "content": "<p>Hello</p>"}))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::OK]);

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/public/pages/about").to_request(),
    )
    .await;
    assert_eq!(page["title"], "About Us");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/public/pages/missing").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_seed_fills_empty_tables_and_reset_is_forbidden_outside_development() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let req = test::TestRequest::post()
        .uri("/api/db/seed")
        .insert_header(bearer(&token))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["inserted"]["businessInfo"], 1);
    assert_eq!(first["inserted"]["testimonials"], 3);

    let req = test::TestRequest::post()
        .uri("/api/db/seed")
        .insert_header(bearer(&token))
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second["inserted"]["testimonials"], 0);

    let req = test::TestRequest::post()
        .uri("/api/db/reset")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

/// POST a JSON body as an admin, assert 201 and return the created record.
macro_rules! post_json {
    ($app:expr, $token:expr, $uri:expr, $body:expr $(,)?) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .insert_header(bearer($token))
            .set_json($body)
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED, "POST {}", $uri);
        let created: Value = test::read_body_json(resp).await;
        created
    }};
}

#[actix_web::test]
async fn test_huge_page_number_is_capped() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let req = test::TestRequest::get()
        .uri("/api/customers?page=18446744073709551615&limit=100")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["customers"], json!([]));
    assert_eq!(body["pagination"]["page"], 1_000_000);
    assert_eq!(body["pagination"]["total"], 0);
}

#[actix_web::test]
async fn test_admin_pages_redirect_to_sign_in() {
    let db = setup_db().await;
    let app = test_app!(db);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/admin").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/auth/signin");

    let (_, viewer) = token_for(&db, "viewer@example.com", Role::User).await;
    let req = test::TestRequest::get()
        .uri("/admin")
        .cookie(Cookie::new(SESSION_COOKIE, viewer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/auth/signin");

    let (_, admin) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;
    let req = test::TestRequest::get()
        .uri("/admin")
        .cookie(Cookie::new(SESSION_COOKIE, admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "admin home");
}

#[actix_web::test]
async fn test_resource_and_dashboard_stats() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    for (name, rating, featured) in [("Ann", 5, true), ("Bo", 4, false)] {
        post_json!(
            &app,
            &token,
            "/api/content/testimonials",
            json!({
                "customerName": name,
                "testimonialText": "Solid job",
                "rating": rating,
                "projectType": "Roofing",
                "isFeatured": featured,
            }),
        );
    }
    post_json!(
        &app,
        &token,
        "/api/customers",
        json!({"firstName": "Cy", "lastName": "Lee", "email": "cy@example.com", "source": "referral"}),
    );
    post_json!(
        &app,
        &token,
        "/api/customers",
        json!({
            "firstName": "Di",
            "lastName": "Ng",
            "email": "di@example.com",
            "customerType": "COMMERCIAL",
            "isActive": false,
        }),
    );
    for (title, value) in [("Kitchen", 1500.5), ("Bath", 2500.0)] {
        post_json!(
            &app,
            &token,
            "/api/content/portfolio",
            json!({"title": title, "serviceCategory": "Remodeling", "projectValue": value}),
        );
    }

    let get = |uri: &'static str| {
        test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request()
    };

    let testimonials: Value =
        test::call_and_read_body_json(&app, get("/api/content/testimonials/stats")).await;
    assert_eq!(testimonials["total"], 2);
    assert_eq!(testimonials["visible"], 2);
    assert_eq!(testimonials["featured"], 1);
    assert_eq!(testimonials["averageRating"], 4.5);
    assert_eq!(testimonials["newThisMonth"], 2);
    assert_eq!(testimonials["byRating"]["5"], 1);
    assert_eq!(testimonials["byRating"]["4"], 1);
    assert_eq!(testimonials["byRating"]["1"], 0);
    assert_eq!(
        testimonials["byProjectType"],
        json!([{"projectType": "Roofing", "count": 2}])
    );

    let customers: Value = test::call_and_read_body_json(&app, get("/api/customers/stats")).await;
    assert_eq!(customers["total"], 2);
    assert_eq!(customers["active"], 1);
    assert_eq!(customers["inactive"], 1);
    assert_eq!(customers["newThisYear"], 2);
    assert_eq!(
        customers["byType"],
        json!({"COMMERCIAL": 1, "INDUSTRIAL": 0, "RESIDENTIAL": 1})
    );
    assert!(
        customers["bySource"]
            .as_array()
            .unwrap()
            .contains(&json!({"source": "referral", "count": 1}))
    );

    let portfolio: Value =
        test::call_and_read_body_json(&app, get("/api/content/portfolio/stats")).await;
    assert_eq!(portfolio["total"], 2);
    assert_eq!(portfolio["visible"], 2);
    assert_eq!(portfolio["totalProjectValue"], 4000.5);
    assert_eq!(
        portfolio["byCategory"],
        json!([{"category": "Remodeling", "count": 2}])
    );

    let dashboard: Value = test::call_and_read_body_json(&app, get("/api/dashboard/stats")).await;
    assert_eq!(dashboard["overview"]["totalSubmissions"], 0);
    assert_eq!(dashboard["overview"]["totalCustomers"], 2);
    assert_eq!(dashboard["overview"]["activeCustomers"], 1);
    assert_eq!(dashboard["overview"]["totalTestimonials"], 2);
    assert_eq!(dashboard["overview"]["portfolioItems"], 2);
    assert_eq!(dashboard["formsByStatus"]["NEW"], 0);
    assert_eq!(dashboard["recentSubmissions"], json!([]));
    assert_eq!(dashboard["performance"]["averageResponseTime"], "2 hours");
    assert_eq!(dashboard["performance"]["customerSatisfaction"], 4.5);
    assert_eq!(dashboard["performance"]["responseRate"], 0.0);
    assert_eq!(
        dashboard["systemHealth"],
        json!({"status": "healthy", "database": "connected", "cache": "disabled"})
    );
}

#[actix_web::test]
async fn test_put_replaces_and_patch_merges() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let created = post_json!(
        &app,
        &token,
        "/api/customers",
        json!({
            "firstName": "Eve",
            "lastName": "Ito",
            "email": "eve@example.com",
            "phone": "555-0199",
            "company": "Ito Builders",
        }),
    );
    let uri = format!("/api/customers/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(bearer(&token))
        .set_json(json!({"city": "Austin", "company": null}))
        .to_request();
    let patched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(patched["city"], "Austin");
    assert_eq!(patched["phone"], "555-0199");
    assert_eq!(patched["company"], Value::Null);
    assert_eq!(patched["firstName"], "Eve");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&token))
        .set_json(json!({"firstName": "Eve", "lastName": "Ito", "email": "eve@example.com"}))
        .to_request();
    let replaced: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(replaced["id"], created["id"]);
    assert_eq!(replaced["phone"], Value::Null);
    assert_eq!(replaced["city"], Value::Null);
    assert_eq!(replaced["customerType"], "RESIDENTIAL");
}

#[actix_web::test]
async fn test_put_and_delete_unknown_ids_are_not_found() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;
    let missing = uuid::Uuid::new_v4();

    let cases = [
        (
            "/api/content/testimonials",
            json!({"customerName": "Nobody", "testimonialText": "Never written"}),
        ),
        (
            "/api/customers",
            json!({"firstName": "No", "lastName": "One", "email": "no@example.com"}),
        ),
        (
            "/api/content/portfolio",
            json!({"title": "Ghost", "serviceCategory": "None"}),
        ),
    ];
    for (base, body) in cases {
        let uri = format!("{base}/{missing}");

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND, "PUT {uri}");

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND,
            "DELETE {uri}"
        );
    }
}

#[actix_web::test]
async fn test_reorder_swaps_orders_and_next_create_goes_last() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let mut ids = Vec::new();
    for name in ["A", "B"] {
        let body = post_json!(
            &app,
            &token,
            "/api/content/testimonials",
            json!({"customerName": name, "testimonialText": "Good"}),
        );
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::put()
        .uri("/api/content/testimonials/reorder")
        .insert_header(bearer(&token))
        .set_json(json!({"testimonials": [
            {"id": ids[0], "displayOrder": 3},
            {"id": ids[1], "displayOrder": 1},
        ]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["updated"], 2);

    for (id, expected) in [(&ids[0], 3), (&ids[1], 1)] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/content/testimonials/{id}"))
            .insert_header(bearer(&token))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["displayOrder"], expected);
    }

    let third = post_json!(
        &app,
        &token,
        "/api/content/testimonials",
        json!({"customerName": "C", "testimonialText": "Good"}),
    );
    assert_eq!(third["displayOrder"], 4);
}

#[actix_web::test]
async fn test_setting_upsert_keeps_unsent_fields() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    post_json!(
        &app,
        &token,
        "/api/settings",
        json!({"key": "hours", "value": "9-5", "description": "Opening hours", "isPublic": true}),
    );

    let req = test::TestRequest::post()
        .uri("/api/settings")
        .insert_header(bearer(&token))
        .set_json(json!({"key": "hours", "value": "8-6"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["value"], "8-6");
    assert_eq!(updated["description"], "Opening hours");
    assert_eq!(updated["isPublic"], true);

    let req = test::TestRequest::get()
        .uri("/api/settings")
        .insert_header(bearer(&token))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["pagination"]["total"], 1);
}

#[actix_web::test]
async fn test_duplicate_email_is_a_unique_violation() {
    let db = setup_db().await;

    let first = user_db::create_user(&db, "dup@example.com".into(), None, Role::Admin, None)
        .await
        .expect("first insert succeeds");
    let err = user_db::create_user(&db, "dup@example.com".into(), None, Role::Admin, None)
        .await
        .expect_err("second insert collides");
    assert!(is_unique_violation(&err));

    let found = user_db::find_or_create_from_auth(
        &db,
        CreateUserFromAuth {
            email: "DUP@example.com".to_string(),
            name: None,
            image: None,
            role: Role::Admin,
        },
    )
    .await
    .expect("existing user is returned");
    assert_eq!(found.id, first.id);
}

#[actix_web::test]
async fn test_created_user_signs_in_with_their_password() {
    let db = setup_db().await;
    let app = test_app!(db);
    let (_, token) = token_for(&db, ADMIN_EMAIL, Role::Admin).await;

    let created = post_json!(
        &app,
        &token,
        "/api/users",
        json!({"email": "ops@crew.example.com", "password": "hunter2-hunter2"}),
    );
    assert!(created.get("passwordHash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/signin/credentials")
        .set_json(json!({"email": "ops@crew.example.com", "password": "not-the-password"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/signin/credentials")
        .set_json(json!({"email": "ops@crew.example.com", "password": "hunter2-hunter2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "ops@crew.example.com");

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .set_json(json!({"email": "OPS@crew.example.com"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}
