use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::auth::Claims;
use crate::models::{HistoryEntryResponse, UserInfo};
use crate::services::history_service::{self, MedicineRequest};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/user/history",
    tag = "User",
    request_body = MedicineRequest,
    responses(
        (status = 200, description = "Search appended to history"),
        (status = 400, description = "Medicine name missing"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_history(
    state: web::Data<AppState>,
    user: web::ReqData<Claims>,
    request: web::Json<MedicineRequest>,
) -> HttpResponse {
    log::info!("🕘 POST /user/history - user: {}", user.email);

    let user_id = match user.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match history_service::append_history(state.users.as_ref(), &user_id, &request).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Search history updated"
        })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/user/history",
    tag = "User",
    responses(
        (status = 200, description = "Search history, oldest first", body = [HistoryEntryResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_history(state: web::Data<AppState>, user: web::ReqData<Claims>) -> HttpResponse {
    log::info!("📜 GET /user/history - user: {}", user.email);

    let user_id = match user.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match history_service::get_history(state.users.as_ref(), &user_id).await {
        Ok(history) => HttpResponse::Ok().json(history),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "User",
    responses(
        (status = 200, description = "Profile of the authenticated user", body = UserInfo),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(state: web::Data<AppState>, user: web::ReqData<Claims>) -> HttpResponse {
    let user_id = match user.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.auth.current_user(state.users.as_ref(), &user_id).await {
        Ok(info) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": info
        })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/user/saved",
    tag = "User",
    request_body = MedicineRequest,
    responses(
        (status = 200, description = "Medicine saved"),
        (status = 400, description = "Medicine name missing"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_saved(
    state: web::Data<AppState>,
    user: web::ReqData<Claims>,
    request: web::Json<MedicineRequest>,
) -> HttpResponse {
    log::info!("⭐ POST /user/saved - user: {}", user.email);

    let user_id = match user.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match history_service::save_medicine(state.users.as_ref(), &user_id, &request).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Medicine saved"
        })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/user/saved",
    tag = "User",
    responses(
        (status = 200, description = "Saved medicine names", body = [String]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_saved(state: web::Data<AppState>, user: web::ReqData<Claims>) -> HttpResponse {
    let user_id = match user.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match history_service::get_saved(state.users.as_ref(), &user_id).await {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(e) => e.error_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::models::HistoryEntryResponse;
    use crate::services::auth_service::AuthResponse;
    use crate::testing::{test_state, StaticLabelSource};
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::json;

    #[actix_web::test]
    async fn history_requires_token() {
        let state = web::Data::new(test_state(StaticLabelSource::default()));
        let app = test::init_service(App::new().app_data(state).configure(crate::api::routes)).await;

        let err = test::try_call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/user/history")
                .set_json(json!({ "medicine": "Advil" }))
                .to_request(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        let err = test::try_call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/user/saved")
                .insert_header(("Authorization", "Token abc"))
                .to_request(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Invalid token format"));
    }

    #[actix_web::test]
    async fn history_and_saved_round_trip() {
        let state = web::Data::new(test_state(StaticLabelSource::default()));
        let app = test::init_service(App::new().app_data(state).configure(crate::api::routes)).await;

        let auth: AuthResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({ "name": "Ana", "email": "ana@example.com", "password": "secret1" }))
                .to_request(),
        )
        .await;
        let bearer = ("Authorization", format!("Bearer {}", auth.token));

        for medicine in ["Advil", "Tylenol", "Advil"] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/user/history")
                    .insert_header(bearer.clone())
                    .set_json(json!({ "medicine": medicine }))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
        }

        let missing = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/user/history")
                .insert_header(bearer.clone())
                .set_json(json!({}))
                .to_request(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let history: Vec<HistoryEntryResponse> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/user/history")
                .insert_header(bearer.clone())
                .to_request(),
        )
        .await;
        let names: Vec<&str> = history.iter().map(|e| e.medicine.as_str()).collect();
        assert_eq!(names, ["Advil", "Tylenol", "Advil"]);

        for _ in 0..2 {
            test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/user/saved")
                    .insert_header(bearer.clone())
                    .set_json(json!({ "medicine": "Advil" }))
                    .to_request(),
            )
            .await;
        }

        let saved: Vec<String> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/user/saved")
                .insert_header(bearer.clone())
                .to_request(),
        )
        .await;
        assert_eq!(saved, ["Advil"]);

        let me: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/user/me")
                .insert_header(bearer)
                .to_request(),
        )
        .await;
        assert_eq!(me["user"]["searchHistory"].as_array().unwrap().len(), 3);
    }
}
