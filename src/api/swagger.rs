use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MedScan API",
        version = "1.0.0",
        description = "Medicine label lookup backed by openFDA, with a local cache and per-user search history.\n\n**Authentication:** `/api/user/*` and `/api/auth/me` require a JWT Bearer token.\n\n**Features:**\n- Label lookup with brand, generic and substance fallback\n- Most searched medicines\n- Plain-English summaries with a safety badge\n- Search history and saved medicines"
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::get_me,

        // Medicine
        crate::api::medicine::search,
        crate::api::medicine::summary,
        crate::api::medicine::popular,

        // User
        crate::api::user::add_history,
        crate::api::user::get_history,
        crate::api::user::profile,
        crate::api::user::add_saved,
        crate::api::user::get_saved,

        // Health & Metrics
        crate::api::health::banner,
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::AuthResponse,
            crate::models::UserInfo,
            crate::models::HistoryEntryResponse,

            // Medicine
            crate::models::MedicineResponse,
            crate::models::SearchResponse,
            crate::models::PopularMedicine,
            crate::models::LookupSource,
            crate::presentation::MedicineSummary,
            crate::presentation::SimplifiedText,
            crate::presentation::SafetyBadge,
            crate::presentation::SafetyLevel,

            // User
            crate::services::history_service::MedicineRequest,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Email and password registration, login and token-based identity."),
        (name = "Medicine", description = "Label lookup, summaries and popularity. No authentication required."),
        (name = "User", description = "Search history and saved medicines of the authenticated user."),
        (name = "Health", description = "Health check and lookup metrics for monitoring."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/auth/login or /api/auth/register"))
                        .build()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/medicine/search/{name}",
            "/api/auth/register",
            "/api/user/history",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
