use actix_web::{web, HttpResponse, ResponseError};

use crate::config::AuthSettings;
use crate::database::UserStore;
use crate::middleware::auth::Claims;
use crate::services::auth_service::{self, AuthResponse, LoginRequest, RegisterRequest};

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, auth_token cookie set", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Unexpected server error")
    )
)]
pub async fn login(
    users: web::Data<dyn UserStore>,
    settings: web::Data<AuthSettings>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔐 POST /api/login - email: {}", email);

    match auth_service::login(users.get_ref(), &settings, &request).await {
        Ok(session) => {
            log::info!("✅ Login successful: {}", session.response.user.email);
            HttpResponse::Ok()
                .cookie(auth_service::session_cookie(session.token, &settings))
                .json(session.response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, auth_token cookie set", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    users: web::Data<dyn UserStore>,
    settings: web::Data<AuthSettings>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /api/register - email: {}", email);

    match auth_service::register(users.get_ref(), &settings, &request).await {
        Ok(session) => {
            log::info!("✅ Registration successful: {}", session.response.user.email);
            HttpResponse::Created()
                .cookie(auth_service::session_cookie(session.token, &settings))
                .json(session.response)
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
pub async fn logout(settings: web::Data<AuthSettings>) -> HttpResponse {
    log::info!("👋 POST /api/logout");

    HttpResponse::Ok()
        .cookie(auth_service::removal_cookie(&settings))
        .json(serde_json::json!({
            "success": true,
            "message": "Logged out"
        }))
}

#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = crate::models::UserInfo),
        (status = 401, description = "No valid session"),
        (status = 404, description = "User no longer exists")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn me(
    claims: web::ReqData<Claims>,
    users: web::Data<dyn UserStore>,
) -> HttpResponse {
    log::info!("👤 GET /api/me - user: {}", claims.sub);

    match auth_service::current_user(users.get_ref(), &claims).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": user
        })),
        Err(e) => {
            log::warn!("❌ Failed to load current user {}: {}", claims.sub, e);
            e.error_response()
        }
    }
}
