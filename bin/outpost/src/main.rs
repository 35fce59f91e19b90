//! # Outpost Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_web::{web, App, HttpServer};
use chrono::Utc;
use op_api::handlers::AppState;
use op_api::{configure_routes, middleware};
use op_core::config::AppConfig;
use op_core::models::{Role, User};
use op_core::traits::{AuthProvider, UserRepo};
use uuid::Uuid;

// Feature-gated imports: the binary is compiled to order
#[cfg(feature = "db-sqlite")]
use op_db_sqlite::SqliteStore;

#[cfg(feature = "auth-simple")]
use op_auth_simple::SimpleAuthProvider;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // 1. Load process configuration
    let config = AppConfig::from_env();

    // 2. Initialize Database Implementation
    #[cfg(feature = "db-sqlite")]
    let store = SqliteStore::connect(&config.database_url)
        .await
        .expect("Failed to init SQLite");

    // 3. Initialize Auth Implementation
    #[cfg(feature = "auth-simple")]
    let auth = SimpleAuthProvider::new(&config.session_salt);

    // 4. Bootstrap the admin account when configured and missing
    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        ensure_admin(&store, &auth, username, password)
            .await
            .expect("Failed to bootstrap admin account");
    }

    // 5. Wrap in AppState (dynamic dispatch keeps the plugins swappable)
    let state = web::Data::new(AppState {
        posts: Box::new(store.clone()),
        users: Box::new(store.clone()),
        settings: Box::new(store),
        auth: Box::new(auth),
    });

    log::info!("Outpost API listening on http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::cors_policy())
            .wrap(middleware::request_logger())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}

/// Creates the configured admin account on first boot so a fresh install
/// has someone who can moderate.
async fn ensure_admin(
    users: &dyn UserRepo,
    auth: &dyn AuthProvider,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    if users.get_user_by_username(username).await?.is_some() {
        return Ok(());
    }

    let user = User {
        id: Uuid::now_v7(),
        username: username.to_string(),
        password_hash: auth.hash_password(password)?,
        role: Role::Admin,
        created_at: Utc::now(),
    };
    users.create_user(&user).await?;
    log::info!("bootstrapped admin account '{username}'");
    Ok(())
}
