//! # op-api
//!
//! The web routing and orchestration layer for Outpost. Handlers stay thin:
//! extract the actor, fetch the target, run the interaction rules, apply the
//! mutation through the store ports, serialize the result.

pub mod admin;
pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

#[cfg(test)]
mod tests;

/// Configures the routes for the community API.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(handlers::register))
            .route("/login", web::post().to(handlers::login)),
    )
    .service(
        web::scope("/admin")
            .route("/moderation-queue", web::get().to(admin::moderation_queue))
            .route("/analytics", web::get().to(admin::analytics))
            .route("/posts/{id}/approve", web::patch().to(admin::approve_post))
            .route("/posts/{id}", web::delete().to(admin::reject_post))
            .route("/users/{id}", web::delete().to(admin::delete_user))
            .route("/settings", web::get().to(admin::get_settings))
            .route("/settings", web::put().to(admin::update_settings)),
    )
    .service(
        web::scope("/posts")
            .route("", web::get().to(handlers::list_posts))
            .route("", web::post().to(handlers::create_post))
            .route("/{id}", web::get().to(handlers::get_post))
            .route("/{id}", web::patch().to(handlers::edit_post))
            .route("/{id}", web::delete().to(handlers::delete_post))
            .route("/{id}/taxonomy", web::patch().to(handlers::edit_taxonomy))
            .route("/{id}/pin", web::patch().to(handlers::toggle_pin))
            .route("/{id}/lock", web::patch().to(handlers::toggle_lock))
            .route("/{id}/solution", web::patch().to(handlers::toggle_solution))
            .route("/{id}/like", web::post().to(handlers::like_post))
            .route("/{id}/thank", web::post().to(handlers::thank_post))
            .route("/{id}/flag", web::post().to(handlers::flag_post))
            .route("/{id}/reply", web::post().to(handlers::create_reply))
            .route("/{id}/reply/{reply_id}", web::delete().to(handlers::delete_reply))
            .route(
                "/{id}/reply/{reply_id}/like",
                web::post().to(handlers::like_reply),
            ),
    );
}
