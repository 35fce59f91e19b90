//! # op-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.
//! Every mutating handler follows the same shape: resolve the actor, fetch
//! the target post, run the interaction rules, then apply exactly one store
//! mutation. Rule violations are caught before any write happens.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use op_core::authz::{authorize, PostAction};
use op_core::error::AppError;
use op_core::models::{Actor, Category, Post, Reply, Role, SiteSettings, User};
use op_core::traits::{AuthProvider, PostRepo, SettingsStore, UserRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub posts: Box<dyn PostRepo>,
    pub users: Box<dyn UserRepo>,
    pub settings: Box<dyn SettingsStore>,
    pub auth: Box<dyn AuthProvider>,
}

// ── Actor resolution ────────────────────────────────────────────────────────

/// Resolves the bearer token into an `Actor`, re-reading the role from the
/// user store so demotions take effect on the next request.
pub(crate) async fn require_actor(
    data: &AppState,
    req: &HttpRequest,
) -> Result<Actor, ApiError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("malformed authorization header".to_string()))?;

    let user_id = data
        .auth
        .verify_token(token)
        .ok_or_else(|| AppError::Unauthorized("invalid token".to_string()))?;
    let user = data
        .users
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("token refers to a deleted account".to_string()))?;

    Ok(Actor {
        id: user.id,
        role: user.role,
    })
}

pub(crate) async fn fetch_post(data: &AppState, id: Uuid) -> Result<Post, ApiError> {
    data.posts
        .get_post(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Post", id)))
}

// ── Validation ──────────────────────────────────────────────────────────────

/// Basic sanitization: escape HTML so stored content is safe to render raw.
fn sanitize(raw: &str) -> String {
    html_escape::encode_safe(raw).to_string()
}

fn validated_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError(AppError::Validation(
            "title must not be empty".to_string(),
        )));
    }
    Ok(sanitize(title))
}

fn validated_body(body: &str) -> Result<String, ApiError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ApiError(AppError::Validation(
            "body must not be empty".to_string(),
        )));
    }
    Ok(sanitize(body))
}

fn validated_category(code: &str) -> Result<Category, ApiError> {
    Category::parse(code)
        .ok_or_else(|| ApiError(AppError::Validation(format!("unknown category: {code}"))))
}

/// Tags are a set: trimmed, deduplicated, order-normalized, bounded.
fn validated_tags(tags: &[String], settings: &SiteSettings) -> Result<Vec<String>, ApiError> {
    let mut cleaned: Vec<String> = tags
        .iter()
        .map(|t| sanitize(t.trim().to_lowercase().as_str()))
        .filter(|t| !t.is_empty())
        .collect();
    cleaned.sort();
    cleaned.dedup();
    if cleaned.len() > settings.max_tags_per_post {
        return Err(ApiError(AppError::Validation(format!(
            "at most {} tags per post",
            settings.max_tags_per_post
        ))));
    }
    Ok(cleaned)
}

// ── Accounts ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

pub async fn register(
    data: web::Data<AppState>,
    payload: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, ApiError> {
    let username = payload.username.trim();
    if username.len() < 3 {
        return Err(ApiError(AppError::Validation(
            "username must be at least 3 characters".to_string(),
        )));
    }
    if payload.password.len() < 8 {
        return Err(ApiError(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        )));
    }
    if data.users.get_user_by_username(username).await?.is_some() {
        return Err(ApiError(AppError::Conflict(format!(
            "username {username} is taken"
        ))));
    }

    let user = User {
        id: Uuid::now_v7(),
        username: username.to_string(),
        password_hash: data.auth.hash_password(&payload.password)?,
        role: Role::User,
        created_at: Utc::now(),
    };
    data.users.create_user(&user).await?;

    let token = data.auth.issue_token(user.id);
    Ok(HttpResponse::Created().json(json!({ "token": token, "user": user })))
}

pub async fn login(
    data: web::Data<AppState>,
    payload: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = data
        .users
        .get_user_by_username(payload.username.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("unknown username or wrong password".to_string()))?;

    if !data
        .auth
        .verify_password(&payload.password, &user.password_hash)
        .await
    {
        return Err(ApiError(AppError::Unauthorized(
            "unknown username or wrong password".to_string(),
        )));
    }

    let token = data.auth.issue_token(user.id);
    Ok(HttpResponse::Ok().json(json!({ "token": token, "user": user })))
}

// ── Posts ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub async fn create_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&data, &req).await?;
    let settings = data.settings.load().await?;

    let now = Utc::now();
    let post = Post {
        id: Uuid::now_v7(),
        author_id: actor.id,
        title: validated_title(&payload.title)?,
        body: validated_body(&payload.body)?,
        category: validated_category(&payload.category)?,
        tags: validated_tags(&payload.tags, &settings)?,
        is_pinned: false,
        is_locked: false,
        is_solution: false,
        flagged_for_review: false,
        flag_count: 0,
        moderation_report: None,
        views: 0,
        like_count: 0,
        thank_count: 0,
        reply_count: 0,
        created_at: now,
        updated_at: now,
    };
    data.posts.create_post(&post).await?;

    Ok(HttpResponse::Created().json(post))
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list_posts(
    data: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, ApiError> {
    let settings = data.settings.load().await?;
    let category = match &query.category {
        Some(code) => Some(validated_category(code)?),
        None => None,
    };
    let limit = query
        .limit
        .unwrap_or(settings.posts_per_page)
        .clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let posts = data.posts.list_posts(category, limit, offset).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub replies: Vec<Reply>,
}

pub async fn get_post(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    // The view counter bumps before the read so the caller sees it.
    data.posts.record_view(id).await?;
    let post = fetch_post(&data, id).await?;
    let replies = data.posts.get_replies(id).await?;

    Ok(HttpResponse::Ok().json(PostView { post, replies }))
}

#[derive(Debug, Deserialize)]
pub struct EditPostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

pub async fn edit_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    payload: web::Json<EditPostRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, id).await?;
    authorize(&actor, PostAction::EditContent, &post)?;

    let title = match &payload.title {
        Some(title) => validated_title(title)?,
        None => post.title.clone(),
    };
    let body = match &payload.body {
        Some(body) => validated_body(body)?,
        None => post.body.clone(),
    };
    data.posts.update_content(id, &title, &body).await?;

    let updated = fetch_post(&data, id).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[derive(Debug, Deserialize)]
pub struct EditTaxonomyRequest {
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub async fn edit_taxonomy(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    payload: web::Json<EditTaxonomyRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, id).await?;
    authorize(&actor, PostAction::EditTaxonomy, &post)?;

    let settings = data.settings.load().await?;
    let category = match &payload.category {
        Some(code) => validated_category(code)?,
        None => post.category,
    };
    let tags = match &payload.tags {
        Some(tags) => validated_tags(tags, &settings)?,
        None => post.tags.clone(),
    };
    data.posts.update_taxonomy(id, category, &tags).await?;

    let updated = fetch_post(&data, id).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, id).await?;
    authorize(&actor, PostAction::Delete, &post)?;

    data.posts.delete_post(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ── Moderation toggles ──────────────────────────────────────────────────────

async fn moderation_toggle(
    data: &AppState,
    req: &HttpRequest,
    id: Uuid,
    action: PostAction,
) -> Result<bool, ApiError> {
    let actor = require_actor(data, req).await?;
    let post = fetch_post(data, id).await?;
    authorize(&actor, action, &post)?;

    let toggled = match action {
        PostAction::Pin => data.posts.toggle_pinned(id).await?,
        PostAction::Lock => data.posts.toggle_locked(id).await?,
        PostAction::MarkSolution => data.posts.toggle_solution(id).await?,
        _ => unreachable!("moderation_toggle only handles flag toggles"),
    };
    toggled.ok_or_else(|| ApiError(AppError::not_found("Post", id)))
}

pub async fn toggle_pin(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let pinned = moderation_toggle(&data, &req, path.into_inner(), PostAction::Pin).await?;
    Ok(HttpResponse::Ok().json(json!({ "pinned": pinned })))
}

pub async fn toggle_lock(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let locked = moderation_toggle(&data, &req, path.into_inner(), PostAction::Lock).await?;
    Ok(HttpResponse::Ok().json(json!({ "locked": locked })))
}

pub async fn toggle_solution(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let solution =
        moderation_toggle(&data, &req, path.into_inner(), PostAction::MarkSolution).await?;
    Ok(HttpResponse::Ok().json(json!({ "solution": solution })))
}

// ── Engagement ──────────────────────────────────────────────────────────────

pub async fn like_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, id).await?;
    authorize(&actor, PostAction::Like, &post)?;

    let toggle = data.posts.toggle_like(id, actor.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "liked": toggle.active,
        "like_count": toggle.count,
    })))
}

pub async fn thank_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, id).await?;
    authorize(&actor, PostAction::Thank, &post)?;

    let toggle = data.posts.toggle_thank(id, actor.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "thanked": toggle.active,
        "thank_count": toggle.count,
    })))
}

#[derive(Debug, Deserialize)]
pub struct FlagRequest {
    pub reason: String,
}

pub async fn flag_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    payload: web::Json<FlagRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, id).await?;
    authorize(&actor, PostAction::Flag, &post)?;

    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(ApiError(AppError::Validation(
            "a flag needs a reason".to_string(),
        )));
    }
    data.posts.flag_post(id, &sanitize(reason)).await?;

    let updated = fetch_post(&data, id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "flagged": updated.flagged_for_review,
        "flag_count": updated.flag_count,
    })))
}

// ── Replies ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub body: String,
}

pub async fn create_reply(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    payload: web::Json<ReplyRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, id).await?;
    authorize(&actor, PostAction::Reply, &post)?;

    let reply = Reply {
        id: Uuid::now_v7(),
        post_id: id,
        author_id: actor.id,
        body: validated_body(&payload.body)?,
        like_count: 0,
        created_at: Utc::now(),
    };
    data.posts.create_reply(&reply).await?;

    Ok(HttpResponse::Created().json(reply))
}

pub async fn delete_reply(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (post_id, reply_id) = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, post_id).await?;
    let reply = data
        .posts
        .get_reply(post_id, reply_id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Reply", reply_id)))?;
    authorize(
        &actor,
        PostAction::DeleteReply {
            reply_author: reply.author_id,
        },
        &post,
    )?;

    data.posts.delete_reply(post_id, reply_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn like_reply(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (post_id, reply_id) = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, post_id).await?;
    authorize(&actor, PostAction::LikeReply, &post)?;

    let reply = data
        .posts
        .get_reply(post_id, reply_id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Reply", reply_id)))?;
    let toggle = data.posts.toggle_reply_like(reply.id, actor.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "liked": toggle.active,
        "like_count": toggle.count,
    })))
}
