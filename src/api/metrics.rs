use actix_web::HttpResponse;

use crate::utils::metrics;

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Lookup counters in Prometheus text format", content_type = "text/plain")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let counters = metrics::snapshot();

    let body = format!(
        "# HELP medscan_lookups_total Total number of medicine lookups\n\
         # TYPE medscan_lookups_total counter\n\
         medscan_lookups_total {}\n\
         \n\
         # HELP medscan_cache_hits_total Lookups answered from the cache\n\
         # TYPE medscan_cache_hits_total counter\n\
         medscan_cache_hits_total {}\n\
         \n\
         # HELP medscan_label_fetches_total Lookups answered by the label API\n\
         # TYPE medscan_label_fetches_total counter\n\
         medscan_label_fetches_total {}\n\
         \n\
         # HELP medscan_not_found_total Lookups with no matching label\n\
         # TYPE medscan_not_found_total counter\n\
         medscan_not_found_total {}\n",
        counters.lookups, counters.cache_hits, counters.label_fetches, counters.not_found
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};

    #[actix_web::test]
    async fn renders_prometheus_text() {
        let res = get_metrics().await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = to_bytes(res.into_body()).await.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("# TYPE medscan_lookups_total counter"));
        assert!(text.contains("medscan_cache_hits_total "));
    }
}
