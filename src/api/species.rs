use actix_web::{web, HttpResponse, ResponseError};

use crate::services::species_service::{self, ModelInfoResponse, PredictRequest, PredictionResponse};
use crate::services::ModelClient;

/// POST /api/species/predict - Species recognition from gene sequences
#[utoipa::path(
    post,
    path = "/api/species/predict",
    tag = "Species",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Predictions from the model service", body = PredictionResponse),
        (status = 400, description = "No (valid) sequences provided"),
        (status = 502, description = "Model service failed"),
        (status = 503, description = "Model service not configured")
    )
)]
pub async fn predict(
    model: web::Data<ModelClient>,
    request: web::Json<PredictRequest>,
) -> HttpResponse {
    log::info!("🧬 POST /api/species/predict");

    let sequences = match species_service::prepare(request.into_inner()) {
        Ok(sequences) => sequences,
        Err(e) => {
            log::warn!("⚠️  Rejected prediction request: {}", e);
            return e.error_response();
        }
    };

    match model.predict(&sequences).await {
        Ok(response) => {
            log::info!("✅ {} predictions returned", response.total_sequences);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::error!("❌ Prediction failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/species/model-info",
    tag = "Species",
    responses(
        (status = 200, description = "Model description and availability", body = ModelInfoResponse)
    )
)]
pub async fn model_info(model: web::Data<ModelClient>) -> HttpResponse {
    HttpResponse::Ok().json(model.model_info().await)
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    use crate::api::testing::TestState;

    #[actix_web::test]
    async fn invalid_sequences_are_400() {
        let state = TestState::new(vec![], vec![]);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/species/predict")
            .set_json(json!({ "sequences": ["not dna"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unconfigured_model_is_503() {
        let state = TestState::new(vec![], vec![]);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/species/predict")
            .set_json(json!({ "sequences": "ATGCATGC" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn model_info_reports_unconfigured() {
        let state = TestState::new(vec![], vec![]);
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/api/species/model-info").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["configured"], false);
        assert_eq!(body["model_available"], false);
        assert_eq!(body["model_info"]["name"], "Gene Sequence Species Classifier");
    }

    #[actix_web::test]
    async fn large_sequence_batches_are_accepted() {
        let state = TestState::new(vec![], vec![]);
        let app = test_app!(state);

        let sequences: Vec<String> = (0..120).map(|_| "ATGCGT".repeat(110)).collect();
        let payload = json!({ "sequences": sequences });
        assert!(payload.to_string().len() > crate::api::JSON_LIMIT);

        let req = test::TestRequest::post()
            .uri("/api/species/predict")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        // Body parsed; the unconfigured model service answers next
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn model_service_failure_is_502() {
        use actix_web::{web, App};

        use crate::services::ModelClient;

        let (url, server) = crate::api::testing::stub_upstream(
            "/predict",
            500,
            json!({ "success": false, "error": "Model files not found" }),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ModelClient::new(Some(url))))
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/species/predict")
            .set_json(json!({ "sequences": ["ATGC"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Upstream service error");

        server.stop(true).await;
    }
}
