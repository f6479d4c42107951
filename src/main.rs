use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use oceanova::api;
use oceanova::config::AppConfig;
use oceanova::database::{self, ObservationStore, UserStore};
use oceanova::middleware;
use oceanova::services::{email_service, ModelClient};

fn io_error(message: String) -> std::io::Error {
    std::io::Error::other(message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| io_error(e.to_string()))?;

    log::info!("🚀 Starting Oceanova API...");
    log::info!("📊 Database: {}", config.mongodb_db);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&config.mongodb_uri, &config.mongodb_db)
        .await
        .map_err(|e| io_error(format!("Failed to connect to MongoDB: {}", e)))?;
    let db = Arc::new(db);

    log::info!("✅ MongoDB connected successfully");

    let users = web::Data::from(db.clone() as Arc<dyn UserStore>);
    let observations = web::Data::from(db as Arc<dyn ObservationStore>);
    let mailer = web::Data::from(email_service::sender_from_settings(&config.email));
    let model = web::Data::new(ModelClient::new(config.model_service_url.clone()));
    let auth_settings = web::Data::new(config.auth.clone());
    let email_settings = web::Data::new(config.email.clone());

    if config.model_service_url.is_none() {
        log::warn!("⚠️  MODEL_SERVICE_URL not set, species prediction will answer 503");
    }

    let host = config.host.clone();
    let port = config.port;
    let frontend_url = config.frontend_url.clone();

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .expose_headers(vec![header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(users.clone())
            .app_data(observations.clone())
            .app_data(mailer.clone())
            .app_data(model.clone())
            .app_data(auth_settings.clone())
            .app_data(email_settings.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(actix_web::middleware::Compress::default())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
