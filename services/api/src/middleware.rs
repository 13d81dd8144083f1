//! Session guards
//!
//! The page guard fronts the dashboards and answers with redirects. The API
//! guards front JSON routes and answer `401`. Both rebuild the session from
//! the signed token alone.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use common::role::{Role, landing_path};
use common::session::{Claims, token_from_headers};
use tracing::debug;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Login page the page guard sends anonymous visitors to
pub const LOGIN_PATH: &str = "/login";

/// Authenticated account, available to handlers as a request extension
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
    pub name: String,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Decode the request's session; a bad signature or expired token counts
/// as no session at all
fn session_from_headers(state: &AppState, headers: &HeaderMap) -> Option<SessionUser> {
    let token = token_from_headers(headers)?;
    match state.session_tokens.verify(&token) {
        Ok(claims) => Some(SessionUser::from(claims)),
        Err(e) => {
            debug!("Rejected session token: {}", e);
            None
        }
    }
}

/// Login redirect target carrying the originally requested URL
pub fn login_redirect_target(original: &str) -> String {
    format!(
        "{}?callbackUrl={}",
        LOGIN_PATH,
        urlencoding::encode(original)
    )
}

/// Guard for role dashboards
///
/// Anonymous requests go to the login page; a session of another role is
/// sent back to the landing page.
pub async fn page_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(user) = session_from_headers(&state, req.headers()) else {
        let original = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        return Redirect::to(&login_redirect_target(original)).into_response();
    };

    if user.role.dashboard_path() != req.uri().path() {
        debug!(role = %user.role, path = req.uri().path(), "Dashboard of another role");
        return Redirect::to(landing_path(None)).into_response();
    }

    req.extensions_mut().insert(user);
    next.run(req).await
}

async fn api_guard(
    state: &AppState,
    required: Role,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = session_from_headers(state, req.headers()).ok_or(ApiError::Unauthorized)?;

    if user.role != required {
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Guard for routes reserved to service providers
pub async fn service_provider_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    api_guard(&state, Role::ServiceProvider, req, next).await
}

/// Guard for admin console routes
pub async fn admin_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    api_guard(&state, Role::Admin, req, next).await
}
