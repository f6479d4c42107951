use actix_web::{web, HttpResponse, ResponseError};

use crate::database::ObservationStore;
use crate::middleware::auth::Claims;
use crate::services::observation_service::{
    self, DashboardSummary, ObservationListResponse, ObservationQuery,
};

/// GET /api/observations - Recent observations for the dashboard
#[utoipa::path(
    get,
    path = "/api/observations",
    tag = "Dashboard",
    params(
        ("region" = Option<String>, Query, description = "Exact region name"),
        ("species" = Option<String>, Query, description = "Exact species name"),
        ("limit" = Option<i64>, Query, description = "1-500, default 50")
    ),
    responses(
        (status = 200, description = "Observations, newest first", body = ObservationListResponse),
        (status = 401, description = "No valid session")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn list_observations(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn ObservationStore>,
    query: web::Query<ObservationQuery>,
) -> HttpResponse {
    log::info!("📋 GET /api/observations - user: {}", claims.sub);

    match observation_service::list_observations(store.get_ref(), &query).await {
        Ok(response) => {
            log::info!("✅ Listed {} observations", response.total);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::error!("❌ Error listing observations: {}", e);
            e.error_response()
        }
    }
}

/// GET /api/observations/summary - Aggregates for the dashboard cards
#[utoipa::path(
    get,
    path = "/api/observations/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard aggregates", body = DashboardSummary),
        (status = 401, description = "No valid session")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn get_summary(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn ObservationStore>,
) -> HttpResponse {
    log::info!("📊 GET /api/observations/summary - user: {}", claims.sub);

    match observation_service::dashboard_summary(store.get_ref()).await {
        Ok(summary) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "summary": summary
        })),
        Err(e) => {
            log::error!("❌ Error building summary: {}", e);
            e.error_response()
        }
    }
}

/// GET /api/observations/regions - Region names for the dashboard filter
#[utoipa::path(
    get,
    path = "/api/observations/regions",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Sorted distinct region names under `regions`"),
        (status = 401, description = "No valid session")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn get_regions(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn ObservationStore>,
) -> HttpResponse {
    log::info!("🗺️  GET /api/observations/regions - user: {}", claims.sub);

    match observation_service::regions(store.get_ref()).await {
        Ok(regions) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "regions": regions
        })),
        Err(e) => {
            log::error!("❌ Error listing regions: {}", e);
            e.error_response()
        }
    }
}
