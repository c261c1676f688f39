use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::models::{MedicineResponse, PopularMedicine, SearchResponse};
use crate::presentation::MedicineSummary;
use crate::services::medicine_service;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PopularQuery {
    /// Number of entries, 10 by default, at most 100
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/medicine/search/{name}",
    tag = "Medicine",
    params(("name" = String, Path, description = "Brand, generic or substance name")),
    responses(
        (status = 200, description = "Label found in cache or fetched", body = SearchResponse),
        (status = 404, description = "Medicine not found")
    )
)]
pub async fn search(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let name = path.into_inner();
    log::info!("🔍 GET /medicine/search/{}", name);

    match medicine_service::lookup(state.medicines.as_ref(), state.labels.as_ref(), &name).await {
        Ok(result) => HttpResponse::Ok().json(SearchResponse {
            success: true,
            source: result.source,
            data: MedicineResponse::from(result.medicine),
        }),
        Err(e) => {
            log::warn!("❌ Search failed for {}: {}", name, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/medicine/summary/{name}",
    tag = "Medicine",
    params(("name" = String, Path, description = "Brand, generic or substance name")),
    responses(
        (status = 200, description = "Label with plain-English glosses and a safety badge", body = MedicineSummary),
        (status = 404, description = "Medicine not found")
    )
)]
pub async fn summary(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let name = path.into_inner();
    log::info!("🩺 GET /medicine/summary/{}", name);

    match medicine_service::lookup(state.medicines.as_ref(), state.labels.as_ref(), &name).await {
        Ok(result) => HttpResponse::Ok().json(MedicineSummary::new(
            result.source,
            MedicineResponse::from(result.medicine),
        )),
        Err(e) => {
            log::warn!("❌ Summary failed for {}: {}", name, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/medicine/popular",
    tag = "Medicine",
    params(PopularQuery),
    responses(
        (status = 200, description = "Most searched medicines", body = [PopularMedicine])
    )
)]
pub async fn popular(state: web::Data<AppState>, query: web::Query<PopularQuery>) -> HttpResponse {
    log::info!("📈 GET /medicine/popular");

    match medicine_service::top_searched(state.medicines.as_ref(), query.limit).await {
        Ok(popular) => HttpResponse::Ok().json(popular),
        Err(e) => e.error_response(),
    }
}
