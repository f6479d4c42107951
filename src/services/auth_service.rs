use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::database::UserStore;
use crate::models::{User, UserInfo};
use crate::utils::AppError;

pub const AUTH_COOKIE: &str = "auth_token";
const MIN_PASSWORD_LEN: usize = 8;
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user id (hex ObjectId)
    pub email: String,
    pub name: Option<String>,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserInfo,
}

/// A successful login or registration: the body to return and the token to
/// put in the session cookie.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub response: AuthResponse,
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Loose shape check: something@something.tld, no whitespace.
pub fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    }
}

pub fn hash_password(plain: &str, cost: u32) -> Result<String, AppError> {
    Ok(hash(plain, cost)?)
}

pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, AppError> {
    Ok(verify(plain, hashed)?)
}

// Generate JWT token
pub fn generate_token(user: &User, settings: &AuthSettings) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id_hex(),
        email: user.email.clone(),
        name: user.display_name(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(settings.token_ttl_hours)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: settings.audience.clone(),
        iss: settings.issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[settings.audience.as_str()]);
    validation.set_issuer(&[settings.issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

/// Session cookie carrying the JWT.
pub fn session_cookie(token: String, settings: &AuthSettings) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(settings.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(settings.token_ttl_hours))
        .finish()
}

/// Expired cookie that makes the browser drop the session.
pub fn removal_cookie(settings: &AuthSettings) -> Cookie<'static> {
    let mut cookie = Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(settings.cookie_secure)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// User login
pub async fn login(
    users: &dyn UserStore,
    settings: &AuthSettings,
    request: &LoginRequest,
) -> Result<Session, AppError> {
    let (email, password) = match (required(&request.email), required(&request.password)) {
        (Some(email), Some(password)) => (normalize_email(email), password),
        _ => return Err(AppError::InvalidRequest("Email and password are required".to_string())),
    };

    let user = users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(password, &user.password)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    if let Some(id) = &user.id {
        if let Err(e) = users.record_login(id, Utc::now().timestamp()).await {
            log::warn!("⚠️  Could not record last login for {}: {}", email, e);
        }
    }

    let token = generate_token(&user, settings)?;

    Ok(Session {
        token,
        response: AuthResponse {
            success: true,
            user: UserInfo::from(&user),
        },
    })
}

// User registration
pub async fn register(
    users: &dyn UserStore,
    settings: &AuthSettings,
    request: &RegisterRequest,
) -> Result<Session, AppError> {
    let (email, password) = match (required(&request.email), required(&request.password)) {
        (Some(email), Some(password)) => (normalize_email(email), password),
        _ => return Err(AppError::InvalidRequest("Email and password are required".to_string())),
    };

    if !looks_like_email(&email) {
        return Err(AppError::InvalidRequest("Invalid email address".to_string()));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("An account with this email already exists".to_string()));
    }

    let trimmed = |v: &Option<String>| required(v).map(|s| s.trim().to_string());

    let mut user = User {
        id: None,
        email,
        password: hash_password(password, settings.bcrypt_cost)?,
        first_name: trimmed(&request.first_name),
        last_name: trimmed(&request.last_name),
        avatar: trimmed(&request.avatar),
        created_at: Utc::now().timestamp(),
        last_login: None,
    };

    user.id = Some(users.insert(&user).await?);

    let token = generate_token(&user, settings)?;

    Ok(Session {
        token,
        response: AuthResponse {
            success: true,
            user: UserInfo::from(&user),
        },
    })
}

// Get current user info
pub async fn current_user(users: &dyn UserStore, claims: &Claims) -> Result<UserInfo, AppError> {
    let id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

    users
        .find_by_id(&id)
        .await?
        .map(|user| UserInfo::from(&user))
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::memory::InMemoryUsers;

    pub(crate) fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "test-secret".into(),
            issuer: "oceanova".into(),
            audience: "oceanova-dashboard".into(),
            token_ttl_hours: 1,
            cookie_secure: false,
            bcrypt_cost: 4,
        }
    }

    pub(crate) fn stored_user(email: &str, password: &str) -> User {
        User {
            id: Some(ObjectId::new()),
            email: email.into(),
            password: hash(password, 4).unwrap(),
            first_name: Some("Sylvia".into()),
            last_name: Some("Earle".into()),
            avatar: None,
            created_at: 0,
            last_login: None,
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Diver@Oceanova.ORG "), "diver@oceanova.org");
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.io"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.io"));
        assert!(!looks_like_email("a b@c.io"));
        assert!(!looks_like_email("a@@c.io"));
        assert!(!looks_like_email("a@.io"));
    }

    #[test]
    fn token_round_trip_carries_identity() {
        let user = stored_user("diver@oceanova.org", "correct horse");
        let token = generate_token(&user, &settings()).unwrap();
        let claims = verify_token(&token, &settings()).unwrap();
        assert_eq!(claims.sub, user.id_hex());
        assert_eq!(claims.email, "diver@oceanova.org");
        assert_eq!(claims.name.as_deref(), Some("Sylvia Earle"));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let user = stored_user("diver@oceanova.org", "correct horse");
        let mut other = settings();
        other.jwt_secret = "another-secret".into();
        let token = generate_token(&user, &other).unwrap();
        assert!(matches!(verify_token(&token, &settings()), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn token_for_other_audience_is_rejected() {
        let user = stored_user("diver@oceanova.org", "correct horse");
        let mut other = settings();
        other.audience = "someone-else".into();
        let token = generate_token(&user, &other).unwrap();
        assert!(verify_token(&token, &settings()).is_err());
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = session_cookie("abc".into(), &settings());
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(CookieDuration::hours(1)));
    }

    #[tokio::test]
    async fn login_normalizes_email_and_records_login() {
        let users = InMemoryUsers::with_users(vec![stored_user("diver@oceanova.org", "correct horse")]);
        let session = login(&users, &settings(), &login_request(" Diver@Oceanova.org ", "correct horse"))
            .await
            .unwrap();

        assert!(session.response.success);
        assert_eq!(session.response.user.email, "diver@oceanova.org");
        assert!(users.snapshot()[0].last_login.is_some());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let users = InMemoryUsers::with_users(vec![stored_user("diver@oceanova.org", "correct horse")]);
        let err = login(&users, &settings(), &login_request("diver@oceanova.org", "battery staple"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_with_same_message() {
        let users = InMemoryUsers::default();
        let err = login(&users, &settings(), &login_request("nobody@oceanova.org", "whatever"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Unauthorized: {}", INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let users = InMemoryUsers::default();
        let request = LoginRequest { email: Some("diver@oceanova.org".into()), password: Some("  ".into()) };
        let err = login(&users, &settings(), &request).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn register_hashes_password_and_rejects_duplicates() {
        let users = InMemoryUsers::default();
        let request = RegisterRequest {
            email: Some("New@Oceanova.org".into()),
            password: Some("long enough".into()),
            first_name: Some(" Jacques ".into()),
            last_name: None,
            avatar: None,
        };

        let session = register(&users, &settings(), &request).await.unwrap();
        assert_eq!(session.response.user.email, "new@oceanova.org");
        assert_eq!(session.response.user.first_name.as_deref(), Some("Jacques"));

        let stored = users.snapshot();
        assert_ne!(stored[0].password, "long enough");
        assert!(verify_password("long enough", &stored[0].password).unwrap());

        let err = register(&users, &settings(), &request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let users = InMemoryUsers::default();
        let request = RegisterRequest {
            email: Some("new@oceanova.org".into()),
            password: Some("short".into()),
            first_name: None,
            last_name: None,
            avatar: None,
        };
        let err = register(&users, &settings(), &request).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn current_user_resolves_claims() {
        let user = stored_user("diver@oceanova.org", "correct horse");
        let users = InMemoryUsers::with_users(vec![user.clone()]);
        let token = generate_token(&user, &settings()).unwrap();
        let claims = verify_token(&token, &settings()).unwrap();

        let info = current_user(&users, &claims).await.unwrap();
        assert_eq!(info.id, user.id_hex());
    }
}
