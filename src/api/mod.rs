#[cfg(test)]
#[macro_use]
pub(crate) mod testing;

pub mod auth;
pub mod contact;
pub mod health;
pub mod observations;
pub mod ocean;
pub mod species;
pub mod swagger;

use actix_web::{error, web, HttpResponse};

use crate::middleware::AuthMiddleware;

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": message
    }))
}

/// Body limit for forms and credentials.
pub const JSON_LIMIT: usize = 64 * 1024;
/// Gene sequence batches are much larger than form posts.
pub const SEQUENCE_JSON_LIMIT: usize = 5 * 1024 * 1024;

/// Malformed JSON bodies get the same `{success, error}` shape as handler errors.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let message = format!("Invalid JSON body: {}", err);
            error::InternalError::from_response(err, bad_request(message)).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid query string: {}", err);
        error::InternalError::from_response(err, bad_request(message)).into()
    })
}

/// Route table shared by the server binary and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config(JSON_LIMIT))
        .app_data(query_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                // Auth
                .route("/login", web::post().to(auth::login))
                .route("/register", web::post().to(auth::register))
                .route("/logout", web::post().to(auth::logout))
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::me)),
                )
                // Contact form
                .route("/contact", web::post().to(contact::submit_contact))
                // Dashboard data - requires a session
                .service(
                    web::scope("/observations")
                        .wrap(AuthMiddleware)
                        .route("", web::get().to(observations::list_observations))
                        .route("/summary", web::get().to(observations::get_summary))
                        .route("/regions", web::get().to(observations::get_regions)),
                )
                // Species recognition
                .service(
                    web::scope("/species")
                        .app_data(json_config(SEQUENCE_JSON_LIMIT))
                        .route("/predict", web::post().to(species::predict))
                        .route("/model-info", web::get().to(species::model_info)),
                )
                // Water quality / ocean conditions
                .service(
                    web::scope("/ocean")
                        .route("/places", web::get().to(ocean::popular_places))
                        .route("/geocode", web::get().to(ocean::geocode))
                        .route("/data", web::get().to(ocean::ocean_data)),
                ),
        );
}
