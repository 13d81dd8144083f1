//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use common::role::Role;
use common::session::{SessionSubject, expired_session_cookie, token_from_headers};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    credentials::{CredentialError, verify_credentials},
    extract::JsonBody,
    models::LoginCredentials,
    registration::{RegistrationError, RegistrationRequest, register as register_account},
    seed::seed_demo_data,
    validation::normalize_email,
};

/// Public part of the logged-in account
#[derive(Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Response for a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub redirect: String,
    pub user: SessionUser,
}

/// Response for the current-role lookup
#[derive(Serialize)]
pub struct CurrentRoleResponse {
    pub role: Role,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/register", post(register))
        .route("/api/user", get(current_role))
        .route("/api/seed", get(seed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<LoginCredentials>,
) -> Result<impl IntoResponse, AuthError> {
    let email = normalize_email(&payload.email);
    info!("Login attempt for: {}", email);

    let account = verify_credentials(state.accounts.as_ref(), &email, &payload.password).await?;

    let token = state
        .session_tokens
        .issue(&SessionSubject {
            id: account.id,
            role: account.role,
            email: &account.email,
            name: &account.name,
        })
        .map_err(|e| {
            error!("Failed to issue session token: {}", e);
            AuthError::InternalServerError
        })?;

    let redirect = safe_callback(payload.callback_url.as_deref())
        .unwrap_or_else(|| account.role.dashboard_path())
        .to_string();

    info!(account_id = %account.id, role = %account.role, "Login successful");

    let response = LoginResponse {
        token: token.clone(),
        role: account.role,
        redirect,
        user: SessionUser {
            id: account.id,
            name: account.name,
            email: account.email,
        },
    };

    let cookie = state.session_tokens.cookie(token);
    Ok((jar.add(cookie), Json(response)))
}

/// Logout endpoint
///
/// Sessions are stateless, so logging out only drops the cookie.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(expired_session_cookie()),
        Json(serde_json::json!({"message": "Logged out"})),
    )
}

/// Registration endpoint for users and service providers
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegistrationRequest>,
) -> Result<impl IntoResponse, AuthError> {
    register_account(state.accounts.as_ref(), payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"message": "Registration successful"})),
    ))
}

/// Role of the current session
pub async fn current_role(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthError> {
    let token = token_from_headers(&headers).ok_or(AuthError::NotAuthenticated)?;
    let claims = state
        .session_tokens
        .verify(&token)
        .map_err(|_| AuthError::NotAuthenticated)?;

    Ok(Json(CurrentRoleResponse { role: claims.role }))
}

/// Demo data endpoint, answers 404 unless seeding is enabled
pub async fn seed(State(state): State<AppState>) -> Result<impl IntoResponse, AuthError> {
    if !state.seed_enabled {
        return Err(AuthError::NotFound);
    }

    let summary = seed_demo_data(state.accounts.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to seed demo data: {}", e);
            AuthError::InternalServerError
        })?;

    Ok(Json(serde_json::json!({
        "message": "Database seeded successfully",
        "created": summary,
    })))
}

/// Accept a post-login target only when it stays on this site
///
/// Browsers strip tabs and newlines from URLs and read `\` as `/`, so none
/// of them may appear anywhere in the path.
fn safe_callback(callback_url: Option<&str>) -> Option<&str> {
    callback_url.filter(|url| {
        url.starts_with('/')
            && !url.starts_with("//")
            && !url
                .chars()
                .any(|c| c == '\\' || c.is_control() || c.is_whitespace())
    })
}

/// Custom error type for authentication errors
#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials,
    AccountDisabled,
    NotAuthenticated,
    BadRequest(String),
    NotFound,
    InternalServerError,
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidCredentials => AuthError::InvalidCredentials,
            CredentialError::AccountDisabled => AuthError::AccountDisabled,
            CredentialError::Store(e) => {
                error!("Account lookup failed: {}", e);
                AuthError::InternalServerError
            }
        }
    }
}

impl From<RegistrationError> for AuthError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(message) => AuthError::BadRequest(message),
            RegistrationError::EmailInUse | RegistrationError::InvalidRole => {
                AuthError::BadRequest(err.to_string())
            }
            RegistrationError::Hash(_) | RegistrationError::Store(_) => {
                error!("Registration failed: {}", err);
                AuthError::InternalServerError
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            AuthError::AccountDisabled => {
                (StatusCode::FORBIDDEN, "Account is disabled".to_string())
            }
            AuthError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            AuthError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AuthError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}
