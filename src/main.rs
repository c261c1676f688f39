mod api;
mod cli;
mod config;
mod database;
mod middleware;
mod models;
mod presentation;
mod services;
mod state;
mod utils;

#[cfg(test)]
mod testing;

use actix_cors::Cors;
use actix_web::{middleware::{Compress, Logger}, web, App, HttpServer};
use clap::Parser;
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::services::{AuthService, OpenFdaClient};
use crate::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Serve) => serve().await,
        Some(Commands::Search { name, server }) => {
            cli::cmd_search(&server, &name.join(" "), &cli::recent_path())
                .await
                .map_err(io::Error::other)
        }
        Some(Commands::Recent) => cli::cmd_recent(&cli::recent_path()).map_err(io::Error::other),
    }
}

async fn serve() -> io::Result<()> {
    let config = AppConfig::from_env().map_err(io::Error::other)?;

    log::info!("🚀 Starting MedScan Service...");

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&config.database_url, config.database_name.as_deref())
        .await
        .map_err(|e| io::Error::other(format!("Failed to connect to MongoDB: {}", e)))?;

    log::info!("✅ MongoDB connected successfully");

    let labels = OpenFdaClient::new(
        &config.label_api_url,
        config.label_api_key.clone(),
        Duration::from_secs(config.label_timeout_secs),
    )
    .map_err(io::Error::other)?;
    let auth = AuthService::new(&config.jwt_secret, config.bcrypt_cost);

    let state = web::Data::new(AppState::new(db, Arc::new(labels), auth));

    let host = config.host.clone();
    let port = config.port;
    let allowed_origin = config.allowed_origin.clone();

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("🔓 CORS origin: {}", allowed_origin);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
