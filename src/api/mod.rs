pub mod auth;
pub mod health;
pub mod medicine;
pub mod metrics;
pub mod swagger;
pub mod user;

use actix_web::web;

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

/// Every HTTP route except the Swagger UI.
pub fn routes(cfg: &mut web::ServiceConfig) {
    // Malformed bodies and query strings get the same JSON error shape
    cfg
        .app_data(web::JsonConfig::default().error_handler(|err, _| {
            AppError::Validation(format!("Invalid request body: {}", err)).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _| {
            AppError::Validation(format!("Invalid query string: {}", err)).into()
        }))
        .route("/", web::get().to(health::banner))
        .route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Medicine lookups are public
        .service(
            web::scope("/api/medicine")
                .route("/search/{name}", web::get().to(medicine::search))
                .route("/summary/{name}", web::get().to(medicine::summary))
                .route("/popular", web::get().to(medicine::popular))
        )
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::get_me))
                )
        )
        // Requires JWT
        .service(
            web::scope("/api/user")
                .wrap(AuthMiddleware)
                .route("/history", web::post().to(user::add_history))
                .route("/history", web::get().to(user::get_history))
                .route("/me", web::get().to(user::profile))
                .route("/saved", web::post().to(user::add_saved))
                .route("/saved", web::get().to(user::get_saved))
        );
}
