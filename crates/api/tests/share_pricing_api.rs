//! HTTP-level integration tests for share tokens and the pricing gate.

mod common;

use axum::http::StatusCode;
use common::{
    assert_error, body_json, build_test_app, delete, get, post_json, put_json_admin, ADMIN_TOKEN,
    OWNER, STRANGER, VIEWER,
};
use serde_json::json;
use sqlx::PgPool;

async fn seed_project(app: &axum::Router) -> i64 {
    let outcome = body_json(
        post_json(
            app.clone(),
            "/api/v1/cart/save",
            OWNER,
            json!({
                "mode": "new_project",
                "project_name": "Deck A",
                "job_name": "Order 1",
                "items": [{"variant_id": "v1", "quantity": 2, "price_cents": 1500}],
                "po_number": "PO-1001",
                "company_name": "Acme Fabrication"
            }),
        )
        .await,
    )
    .await;
    outcome["project_id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Share tokens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mint_and_redeem_share_token(pool: PgPool) {
    let app = build_test_app(pool);
    let project_id = seed_project(&app).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/share"),
        OWNER,
        json!({"role": "view"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let share = body_json(response).await;
    let token = share["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 64, "256-bit hex token");
    assert!(share["redemption_url"].as_str().unwrap().contains(&token));

    // Before redeeming, the stranger has no access.
    let response = get(app.clone(), &format!("/api/v1/projects/{project_id}"), STRANGER).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(
        app.clone(),
        "/api/v1/share/redeem",
        STRANGER,
        json!({"token": token}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = body_json(response).await;
    assert_eq!(project["id"].as_i64(), Some(project_id));

    // Redeeming grants the token's role.
    let detail =
        body_json(get(app.clone(), &format!("/api/v1/projects/{project_id}"), STRANGER).await)
            .await;
    assert_eq!(detail["role"], "view");

    // Redeeming again is a harmless no-op.
    let response = post_json(
        app,
        "/api/v1/share/redeem",
        STRANGER,
        json!({"token": token}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_viewer_cannot_mint_share_token(pool: PgPool) {
    let app = build_test_app(pool);
    let project_id = seed_project(&app).await;
    post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/members"),
        OWNER,
        json!({"email": "viewer@example.com", "role": "view"}),
    )
    .await;

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/share"),
        VIEWER,
        json!({"role": "edit"}),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_redeem_unknown_token_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/share/redeem",
        STRANGER,
        json!({"token": "deadbeef"}),
    )
    .await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_project_invalidates_tokens(pool: PgPool) {
    let app = build_test_app(pool);
    let project_id = seed_project(&app).await;

    let share = body_json(
        post_json(
            app.clone(),
            &format!("/api/v1/projects/{project_id}/share"),
            OWNER,
            json!({"role": "edit"}),
        )
        .await,
    )
    .await;
    let token = share["token"].as_str().unwrap().to_string();

    delete(app.clone(), &format!("/api/v1/projects/{project_id}"), OWNER).await;

    let response = post_json(
        app,
        "/api/v1/share/redeem",
        STRANGER,
        json!({"token": token}),
    )
    .await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Pricing gate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pricing_open_when_no_password_set(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/pricing/unlock", OWNER, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["unlocked"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pricing_password_round_trip(pool: PgPool) {
    let app = build_test_app(pool);

    let response = put_json_admin(
        app.clone(),
        "/api/v1/pricing/password",
        ADMIN_TOKEN,
        json!({"shop": common::SHOP, "password": "hunter2"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app.clone(),
        "/api/v1/pricing/unlock",
        OWNER,
        json!({"password": "wrong"}),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = post_json(
        app.clone(),
        "/api/v1/pricing/unlock",
        OWNER,
        json!({"password": "hunter2"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["unlocked"], true);

    // Clearing the password reopens pricing.
    put_json_admin(
        app.clone(),
        "/api/v1/pricing/password",
        ADMIN_TOKEN,
        json!({"shop": common::SHOP, "password": null}),
    )
    .await;
    let response = post_json(app, "/api/v1/pricing/unlock", OWNER, json!({})).await;
    assert_eq!(body_json(response).await["unlocked"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_password_requires_admin_token(pool: PgPool) {
    let app = build_test_app(pool);
    let response = put_json_admin(
        app,
        "/api/v1/pricing/password",
        "not-the-token",
        json!({"shop": common::SHOP, "password": "hunter2"}),
    )
    .await;
    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}
