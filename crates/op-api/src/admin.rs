//! # Admin Surface
//!
//! Moderation queue, engagement analytics, account removal, and the site
//! settings lifecycle. Post-level decisions still go through the interaction
//! rules; the queue/analytics/settings gates use the role helpers from the
//! same module so no role string is ever compared inline here.

use actix_web::{web, HttpRequest, HttpResponse};
use op_core::authz::{authorize, require_admin, require_staff, PostAction};
use op_core::error::AppError;
use op_core::models::SiteSettings;
use op_core::traits::{PostRepo, SettingsStore, UserRepo};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{fetch_post, require_actor, AppState};

/// Rolling window for the engagement report, in day buckets.
const ANALYTICS_WINDOW_DAYS: i64 = 7;
/// Entries in each of the "top categories" / "most active" rankings.
const ANALYTICS_TOP_ENTRIES: i64 = 5;

pub async fn moderation_queue(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&data, &req).await?;
    require_staff(&actor)?;

    let settings = data.settings.load().await?;
    let queue = data
        .posts
        .flagged_posts(settings.moderation_queue_size)
        .await?;
    Ok(HttpResponse::Ok().json(queue))
}

pub async fn analytics(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&data, &req).await?;
    require_admin(&actor)?;

    let report = data
        .posts
        .engagement_report(ANALYTICS_WINDOW_DAYS, ANALYTICS_TOP_ENTRIES)
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

pub async fn approve_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, id).await?;
    authorize(&actor, PostAction::Approve, &post)?;

    data.posts.approve_post(id).await?;
    let updated = fetch_post(&data, id).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Rejecting a flagged post deletes it outright, replies included.
pub async fn reject_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    let post = fetch_post(&data, id).await?;
    authorize(&actor, PostAction::Reject, &post)?;

    data.posts.delete_post(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Hard-cascade account removal: the account, its posts (with replies), its
/// replies elsewhere, and its like/thank marks all go.
pub async fn delete_user(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let actor = require_actor(&data, &req).await?;
    require_admin(&actor)?;

    if data.users.get_user(id).await?.is_none() {
        return Err(ApiError(AppError::not_found("User", id)));
    }

    let deleted_posts = data.posts.delete_user_content(id).await?;
    data.users.delete_user(id).await?;

    Ok(HttpResponse::Ok().json(json!({ "deleted_posts": deleted_posts })))
}

pub async fn get_settings(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&data, &req).await?;
    require_admin(&actor)?;

    let settings = data.settings.load().await?;
    Ok(HttpResponse::Ok().json(settings))
}

pub async fn update_settings(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<SiteSettings>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&data, &req).await?;
    require_admin(&actor)?;

    let settings = payload.into_inner();
    if settings.posts_per_page < 1 || settings.moderation_queue_size < 1 {
        return Err(ApiError(AppError::Validation(
            "page sizes must be at least 1".to_string(),
        )));
    }
    if settings.site_name.trim().is_empty() {
        return Err(ApiError(AppError::Validation(
            "site name must not be empty".to_string(),
        )));
    }
    data.settings.update(&settings).await?;

    Ok(HttpResponse::Ok().json(settings))
}
