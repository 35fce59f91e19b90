//! # Middleware
//!
//! Standard middleware for the Outpost API.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// Request logger. The 'default' format outputs:
/// remote-ip "request-line" status-code response-size "referrer" "user-agent"
pub fn request_logger() -> Logger {
    Logger::default()
}

/// CORS for the single-page frontend, which is served from its own origin
/// during development.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_header()
        .allowed_methods(vec!["GET", "POST", "PATCH", "PUT", "DELETE"])
        .max_age(3600)
}
