//! HTTP-level integration tests for projects, membership and job
//! management endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    assert_error, body_json, build_test_app, build_test_app_catalog_down, delete, get,
    get_anonymous, post_json, put_json, EDITOR, OWNER, STRANGER, VIEWER,
};
use serde_json::json;
use sqlx::PgPool;

/// Seed one project ("Deck A" / "Order 1", two items) owned by `OWNER`.
async fn seed_project(app: &axum::Router) -> (i64, i64) {
    let outcome = body_json(
        post_json(
            app.clone(),
            "/api/v1/cart/save",
            OWNER,
            json!({
                "mode": "new_project",
                "project_name": "Deck A",
                "job_name": "Order 1",
                "items": [
                    {"variant_id": "v1", "quantity": 2, "price_cents": 1500},
                    {"variant_id": "v2", "quantity": 1, "price_cents": 4200}
                ],
                "po_number": "PO-1001",
                "company_name": "Acme Fabrication"
            }),
        )
        .await,
    )
    .await;
    (
        outcome["project_id"].as_i64().unwrap(),
        outcome["job_id"].as_i64().unwrap(),
    )
}

async fn add_member(app: &axum::Router, project_id: i64, email: &str, role: &str) {
    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/members"),
        OWNER,
        json!({"email": email, "role": role}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Listing and detail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_projects_scoped_to_caller(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, _) = seed_project(&app).await;
    add_member(&app, project_id, "viewer@example.com", "view").await;

    let owned = body_json(get(app.clone(), "/api/v1/projects", OWNER).await).await;
    assert_eq!(owned.as_array().unwrap().len(), 1);

    let member_of = body_json(get(app.clone(), "/api/v1/projects", VIEWER).await).await;
    assert_eq!(member_of.as_array().unwrap().len(), 1);

    let stranger = body_json(get(app, "/api/v1/projects", STRANGER).await).await;
    assert!(stranger.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_resolves_catalog_labels(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, _) = seed_project(&app).await;

    let detail = body_json(get(app, &format!("/api/v1/projects/{project_id}"), OWNER).await).await;
    assert_eq!(detail["role"], "owner");
    assert!(detail["warning"].is_null());
    let items = detail["jobs"][0]["items"].as_array().unwrap();
    assert_eq!(items[0]["variant"]["title"], "Widget v1");
    assert_eq!(items[1]["variant"]["title"], "Widget v2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_degrades_to_placeholders_when_catalog_down(pool: PgPool) {
    let app = build_test_app_catalog_down(pool);
    let (project_id, _) = seed_project(&app).await;

    let response = get(app, &format!("/api/v1/projects/{project_id}"), OWNER).await;
    // Reads never fail on a catalog outage.
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert!(detail["warning"].is_string());
    let items = detail["jobs"][0]["items"].as_array().unwrap();
    assert_eq!(items[0]["variant"]["title"], "Variant v1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_requires_membership(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, _) = seed_project(&app).await;

    let response = get(app, &format!("/api/v1/projects/{project_id}"), STRANGER).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_project_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/projects/424242", OWNER).await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_project_is_owner_only(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, _) = seed_project(&app).await;
    add_member(&app, project_id, "editor@example.com", "edit").await;

    let response = delete(app.clone(), &format!("/api/v1/projects/{project_id}"), EDITOR).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = delete(app.clone(), &format!("/api/v1/projects/{project_id}"), OWNER).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/projects/{project_id}"), OWNER).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Membership management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_member_by_unknown_email_fails(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, _) = seed_project(&app).await;

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/members"),
        OWNER,
        json!({"email": "nobody@example.com", "role": "view"}),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_cannot_be_added_as_member(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, _) = seed_project(&app).await;

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/members"),
        OWNER,
        json!({"email": "owner@example.com", "role": "edit"}),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_management_is_owner_only(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, _) = seed_project(&app).await;
    add_member(&app, project_id, "editor@example.com", "edit").await;

    // Even an editor cannot manage membership.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/members"),
        EDITOR,
        json!({"email": "viewer@example.com", "role": "view"}),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = delete(
        app,
        &format!("/api/v1/projects/{project_id}/members/{EDITOR}"),
        EDITOR,
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_member_revokes_access(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, _) = seed_project(&app).await;
    add_member(&app, project_id, "viewer@example.com", "view").await;

    let response = delete(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/members/{VIEWER}"),
        OWNER,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/projects/{project_id}"), VIEWER).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

// ---------------------------------------------------------------------------
// Jobs over HTTP
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_reorder_jobs(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, first_job) = seed_project(&app).await;

    let created = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/jobs"),
        OWNER,
        json!({"name": "Order 2"}),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let second_job = body_json(created).await["id"].as_i64().unwrap();

    // Viewer cannot reorder.
    let response = put_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/jobs/reorder"),
        STRANGER,
        json!({"ids": [second_job, first_job]}),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/jobs/reorder"),
        OWNER,
        json!({"ids": [second_job, first_job]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let detail = body_json(get(app, &format!("/api/v1/projects/{project_id}"), OWNER).await).await;
    let jobs = detail["jobs"].as_array().unwrap();
    assert_eq!(jobs[0]["id"].as_i64(), Some(second_job));
    assert_eq!(jobs[1]["id"].as_i64(), Some(first_job));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_reorder_is_invalid(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, first_job) = seed_project(&app).await;
    post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/jobs"),
        OWNER,
        json!({"name": "Order 2"}),
    )
    .await;

    let response = put_json(
        app,
        &format!("/api/v1/projects/{project_id}/jobs/reorder"),
        OWNER,
        json!({"ids": [first_job]}),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_ORDER").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_order_edit_and_item_delete(pool: PgPool) {
    let app = build_test_app(pool);
    let (project_id, job_id) = seed_project(&app).await;

    let detail =
        body_json(get(app.clone(), &format!("/api/v1/projects/{project_id}"), OWNER).await).await;
    let items = detail["jobs"][0]["items"].as_array().unwrap();
    let first_item = items[0]["id"].as_i64().unwrap();
    let second_item = items[1]["id"].as_i64().unwrap();

    // Bump one quantity and remove the other row.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/jobs/{job_id}/edit"),
        OWNER,
        json!({
            "updates": [{"item_id": first_item, "quantity": 9}],
            "remove_item_ids": [second_item]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let detail =
        body_json(get(app.clone(), &format!("/api/v1/projects/{project_id}"), OWNER).await).await;
    let items = detail["jobs"][0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 9);

    // Quantity zero is rejected up front.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/jobs/{job_id}/edit"),
        OWNER,
        json!({"updates": [{"item_id": first_item, "quantity": 0}]}),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    // Delete the remaining item directly.
    let response = delete(app.clone(), &format!("/api/v1/items/{first_item}"), OWNER).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let detail = body_json(get(app, &format!("/api/v1/projects/{project_id}"), OWNER).await).await;
    assert!(detail["jobs"][0]["items"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_and_copy_job(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, job_id) = seed_project(&app).await;

    let other = body_json(
        post_json(
            app.clone(),
            "/api/v1/cart/save",
            OWNER,
            json!({
                "mode": "new_project",
                "project_name": "Deck B",
                "job_name": "Order 1",
                "items": [{"variant_id": "v5", "quantity": 1, "price_cents": 900}],
                "po_number": "PO-2001",
                "company_name": "Acme Fabrication"
            }),
        )
        .await,
    )
    .await;
    let other_project = other["project_id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/jobs/{job_id}/copy"),
        OWNER,
        json!({"project_id": other_project}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy = body_json(response).await;
    assert_ne!(copy["id"].as_i64(), Some(job_id));
    assert_eq!(copy["project_id"].as_i64(), Some(other_project));

    let response = post_json(
        app.clone(),
        &format!("/api/v1/jobs/{job_id}/move"),
        OWNER,
        json!({"project_id": other_project}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let detail =
        body_json(get(app, &format!("/api/v1/projects/{other_project}"), OWNER).await).await;
    // Seed job, the copy, then the moved original.
    assert_eq!(detail["jobs"].as_array().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_endpoint_is_public(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_anonymous(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
