use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Oceanova API",
        version = "1.0.0",
        description = "Backend of the Oceanova marine-conservation platform.\n\n**Authentication:** dashboard endpoints require the `auth_token` session cookie set by `/api/login` (a `Bearer` header with the same JWT is also accepted).\n\n**Features:**\n- Email/password login and registration\n- Contact form delivered by email\n- Species observation dashboard\n- Species recognition from gene sequences\n- Ocean and water-quality conditions",
        contact(
            name = "Oceanova Team",
            email = "contact@oceanova.org"
        )
    ),
    paths(
        // Auth
        crate::api::auth::login,
        crate::api::auth::register,
        crate::api::auth::logout,
        crate::api::auth::me,

        // Contact
        crate::api::contact::submit_contact,

        // Dashboard
        crate::api::observations::list_observations,
        crate::api::observations::get_summary,
        crate::api::observations::get_regions,

        // Species
        crate::api::species::predict,
        crate::api::species::model_info,

        // Ocean
        crate::api::ocean::popular_places,
        crate::api::ocean::geocode,
        crate::api::ocean::ocean_data,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::AuthResponse,
            crate::models::UserInfo,
            crate::services::contact_service::ContactRequest,
            crate::services::contact_service::ContactResponse,
            crate::services::observation_service::ObservationListResponse,
            crate::models::DashboardSummary,
            crate::services::species_service::PredictRequest,
            crate::services::species_service::PredictionResponse,
            crate::services::species_service::ModelInfoResponse,
            crate::services::ocean_service::GeocodeResult,
            crate::services::ocean_service::OceanConditions,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Session login, registration and current user."),
        (name = "Contact", description = "Contact form delivered to the Oceanova inbox."),
        (name = "Dashboard", description = "Species observation data for the authenticated dashboard."),
        (name = "Species", description = "Species recognition backed by the external model service."),
        (name = "Ocean", description = "Popular locations, geocoding and water-quality conditions."),
        (name = "Health", description = "Service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("auth_token"))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
