//! End-to-end handler tests: real routes, in-memory SQLite store, real
//! token auth. Each test assembles its own app the way the binary does.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::Utc;
use op_auth_simple::SimpleAuthProvider;
use op_core::models::{Role, User};
use op_core::traits::{AuthProvider, UserRepo};
use op_db_sqlite::SqliteStore;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::configure_routes;
use crate::handlers::AppState;

const TEST_SALT: &str = "e2e-test-salt";

async fn test_state() -> (web::Data<AppState>, SqliteStore, SimpleAuthProvider) {
    let store = SqliteStore::connect("sqlite::memory:")
        .await
        .expect("in-memory store");
    let state = web::Data::new(AppState {
        posts: Box::new(store.clone()),
        users: Box::new(store.clone()),
        settings: Box::new(store.clone()),
        auth: Box::new(SimpleAuthProvider::new(TEST_SALT)),
    });
    (state, store, SimpleAuthProvider::new(TEST_SALT))
}

/// Inserts a user directly into the store and returns their id and a
/// valid bearer token, bypassing the registration endpoint.
async fn seed_user(
    store: &SqliteStore,
    auth: &SimpleAuthProvider,
    username: &str,
    role: Role,
) -> (Uuid, String) {
    let user = User {
        id: Uuid::now_v7(),
        username: username.to_string(),
        password_hash: String::new(),
        role,
        created_at: Utc::now(),
    };
    store.create_user(&user).await.expect("seed user");
    (user.id, auth.issue_token(user.id))
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

fn post_payload() -> Value {
    json!({
        "title": "Which bank accepts a foreign passport?",
        "body": "Opening an account without a residence card seems impossible.",
        "category": "general",
        "tags": ["banking", "paperwork"],
    })
}

#[actix_web::test]
async fn register_login_and_post_lifecycle() {
    let (state, _store, _auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    // Register and pull the token out of the response.
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "username": "wanderer", "password": "longenough1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());

    // Create a post.
    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&token))
        .set_json(post_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    let id = post["id"].as_str().unwrap().to_string();

    // Reading it bumps the view counter and includes (empty) replies.
    let req = test::TestRequest::get().uri(&format!("/posts/{id}")).to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["views"], 1);
    assert_eq!(view["replies"], json!([]));

    // Like toggles on, then back off.
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/like"))
        .insert_header(bearer(&token))
        .to_request();
    let liked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(liked, json!({ "liked": true, "like_count": 1 }));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/like"))
        .insert_header(bearer(&token))
        .to_request();
    let unliked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unliked, json!({ "liked": false, "like_count": 0 }));

    // The login endpoint hands back a working token for the same account.
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": "wanderer", "password": "longenough1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn unauthenticated_mutations_are_rejected() {
    let (state, _store, _auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(post_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unauthorized");
}

#[actix_web::test]
async fn locking_requires_a_moderator() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, author) = seed_user(&store, &auth, "author", Role::User).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&author))
        .set_json(post_payload())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    // Not even the author may lock their own post.
    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}/lock"))
        .insert_header(bearer(&author))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri(&format!("/posts/{id}")).to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["is_locked"], false);
}

#[actix_web::test]
async fn lock_gates_replies_and_likes_for_non_staff() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, user) = seed_user(&store, &auth, "resident", Role::User).await;
    let (_, moderator) = seed_user(&store, &auth, "keeper", Role::Moderator).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&user))
        .set_json(post_payload())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}/lock"))
        .insert_header(bearer(&moderator))
        .to_request();
    let locked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(locked["locked"], true);

    // A plain user bounces off the lock with a conflict, not a 403.
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/reply"))
        .insert_header(bearer(&user))
        .set_json(json!({ "body": "late addition" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/like"))
        .insert_header(bearer(&user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The replies list is untouched.
    let req = test::TestRequest::get().uri(&format!("/posts/{id}")).to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["reply_count"], 0);

    // Staff act through the lock.
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/reply"))
        .insert_header(bearer(&moderator))
        .set_json(json!({ "body": "locking this thread, see the pinned FAQ" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn pinning_is_admin_only_and_toggles() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, user) = seed_user(&store, &auth, "resident", Role::User).await;
    let (_, moderator) = seed_user(&store, &auth, "keeper", Role::Moderator).await;
    let (_, admin) = seed_user(&store, &auth, "founder", Role::Admin).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&user))
        .set_json(post_payload())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}/pin"))
        .insert_header(bearer(&moderator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}/pin"))
        .insert_header(bearer(&admin))
        .to_request();
    let pinned: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pinned["pinned"], true);

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}/pin"))
        .insert_header(bearer(&admin))
        .to_request();
    let unpinned: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unpinned["pinned"], false);
}

#[actix_web::test]
async fn solution_flag_toggles_for_staff() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, user) = seed_user(&store, &auth, "asker", Role::User).await;
    let (_, moderator) = seed_user(&store, &auth, "keeper", Role::Moderator).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&user))
        .set_json(post_payload())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}/solution"))
        .insert_header(bearer(&user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    for expected in [true, false] {
        let req = test::TestRequest::patch()
            .uri(&format!("/posts/{id}/solution"))
            .insert_header(bearer(&moderator))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["solution"], expected);
    }
}

#[actix_web::test]
async fn flag_queue_approve_flow() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, author) = seed_user(&store, &auth, "seller", Role::User).await;
    let (_, reporter) = seed_user(&store, &auth, "reporter", Role::User).await;
    let (_, moderator) = seed_user(&store, &auth, "keeper", Role::Moderator).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&author))
        .set_json(post_payload())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/flag"))
        .insert_header(bearer(&reporter))
        .set_json(json!({ "reason": "looks like a scam listing" }))
        .to_request();
    let flagged: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(flagged, json!({ "flagged": true, "flag_count": 1 }));

    // The queue is staff-only, and contains our post.
    let req = test::TestRequest::get()
        .uri("/admin/moderation-queue")
        .insert_header(bearer(&reporter))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/admin/moderation-queue")
        .insert_header(bearer(&moderator))
        .to_request();
    let queue: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(queue.as_array().unwrap().len(), 1);
    assert_eq!(queue[0]["id"].as_str().unwrap(), id);

    // Approval clears all three moderation fields at once.
    let req = test::TestRequest::patch()
        .uri(&format!("/admin/posts/{id}/approve"))
        .insert_header(bearer(&moderator))
        .to_request();
    let approved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(approved["flagged_for_review"], false);
    assert_eq!(approved["flag_count"], 0);
    assert_eq!(approved["moderation_report"], Value::Null);

    let req = test::TestRequest::get()
        .uri("/admin/moderation-queue")
        .insert_header(bearer(&moderator))
        .to_request();
    let queue: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(queue.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn reject_deletes_the_post_and_its_replies() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, author) = seed_user(&store, &auth, "seller", Role::User).await;
    let (_, moderator) = seed_user(&store, &auth, "keeper", Role::Moderator).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&author))
        .set_json(post_payload())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/reply"))
        .insert_header(bearer(&author))
        .set_json(json!({ "body": "bumping this" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/posts/{id}"))
        .insert_header(bearer(&moderator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri(&format!("/posts/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn taxonomy_edits_are_staff_only() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, author) = seed_user(&store, &auth, "author", Role::User).await;
    let (_, moderator) = seed_user(&store, &auth, "keeper", Role::Moderator).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&author))
        .set_json(post_payload())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    // The author themselves may not re-categorize.
    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}/taxonomy"))
        .insert_header(bearer(&author))
        .set_json(json!({ "category": "jobs" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}/taxonomy"))
        .insert_header(bearer(&moderator))
        .set_json(json!({ "category": "jobs", "tags": ["Remote", "remote", "visa "] }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["category"], "jobs");
    // Tags came back as a deduplicated, normalized set.
    assert_eq!(updated["tags"], json!(["remote", "visa"]));
}

#[actix_web::test]
async fn edit_content_honors_ownership_and_locks() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, author) = seed_user(&store, &auth, "author", Role::User).await;
    let (_, stranger) = seed_user(&store, &auth, "stranger", Role::User).await;
    let (_, moderator) = seed_user(&store, &auth, "keeper", Role::Moderator).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&author))
        .set_json(post_payload())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}"))
        .insert_header(bearer(&stranger))
        .set_json(json!({ "title": "hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}"))
        .insert_header(bearer(&author))
        .set_json(json!({ "title": "Which bank takes newcomers? (solved)" }))
        .to_request();
    let edited: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(edited["title"], "Which bank takes newcomers? (solved)");

    // Once locked, the author is frozen out but staff are not.
    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}/lock"))
        .insert_header(bearer(&moderator))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}"))
        .insert_header(bearer(&author))
        .set_json(json!({ "body": "one more edit" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{id}"))
        .insert_header(bearer(&moderator))
        .set_json(json!({ "body": "tidied up by the mods" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn reply_deletion_is_owner_or_staff() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, author) = seed_user(&store, &auth, "author", Role::User).await;
    let (_, replier) = seed_user(&store, &auth, "replier", Role::User).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&author))
        .set_json(post_payload())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/reply"))
        .insert_header(bearer(&replier))
        .set_json(json!({ "body": "N26 worked for me" }))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    let reply_id = reply["id"].as_str().unwrap().to_string();

    // Owning the post does not grant reply deletion.
    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{id}/reply/{reply_id}"))
        .insert_header(bearer(&author))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{id}/reply/{reply_id}"))
        .insert_header(bearer(&replier))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn deleting_an_account_cascades_and_kills_its_token() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (departing_id, departing) = seed_user(&store, &auth, "departing", Role::User).await;
    let (_, admin) = seed_user(&store, &auth, "founder", Role::Admin).await;

    let mut post_ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&departing))
            .set_json(post_payload())
            .to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        post_ids.push(post["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/users/{departing_id}"))
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["deleted_posts"], 2);

    for id in &post_ids {
        let req = test::TestRequest::get().uri(&format!("/posts/{id}")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    // The orphaned token no longer resolves to an actor.
    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&departing))
        .set_json(post_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn input_validation_rejects_bad_payloads() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, user) = seed_user(&store, &auth, "resident", Role::User).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&user))
        .set_json(json!({ "title": "   ", "body": "text", "category": "general" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&user))
        .set_json(json!({ "title": "t", "body": "text", "category": "politics" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "username": "ok", "password": "longenough1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn settings_lifecycle_is_admin_gated() {
    let (state, store, auth) = test_state().await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let (_, moderator) = seed_user(&store, &auth, "keeper", Role::Moderator).await;
    let (_, admin) = seed_user(&store, &auth, "founder", Role::Admin).await;

    let req = test::TestRequest::get()
        .uri("/admin/settings")
        .insert_header(bearer(&admin))
        .to_request();
    let settings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(settings["posts_per_page"], 20);

    let mut changed = settings.clone();
    changed["site_name"] = json!("Outpost Berlin");
    changed["moderation_queue_size"] = json!(5);

    // Moderators may not touch site settings.
    let req = test::TestRequest::put()
        .uri("/admin/settings")
        .insert_header(bearer(&moderator))
        .set_json(&changed)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri("/admin/settings")
        .insert_header(bearer(&admin))
        .set_json(&changed)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/admin/settings")
        .insert_header(bearer(&admin))
        .to_request();
    let reloaded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reloaded["site_name"], "Outpost Berlin");
    assert_eq!(reloaded["moderation_queue_size"], 5);
}
