//! API service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::{
    discovery::DiscoveryFilter,
    error::{ApiError, ApiResult},
    extract::{JsonBody, PathParam, QueryParams},
    middleware::{SessionUser, admin_guard, page_guard, service_provider_guard},
    models::{AdminAction, AdminActionRequest, ContactResponse, ImageRequest, ServiceNameRequest},
    repositories::admin::AccountTable,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let dashboards = Router::new()
        .route("/user/dashboard", get(user_dashboard))
        .route("/service-provider/dashboard", get(service_provider_dashboard))
        .route("/admin/dashboard", get(admin_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), page_guard));

    let provider_routes = Router::new()
        .route("/api/services", get(list_services).post(create_service))
        .route("/api/services/:id", put(rename_service).delete(delete_service))
        .route("/api/images", get(list_images).post(add_image))
        .route("/api/service-provider/profile", get(provider_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            service_provider_guard,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/users", get(admin_users))
        .route("/api/admin/service-providers", get(admin_service_providers))
        .route("/api/admin/users/:id", post(admin_user_action))
        .route(
            "/api/admin/service-providers/:id",
            post(admin_service_provider_action),
        )
        .route("/api/admin/registration-data", get(registration_data))
        .route("/api/admin/contact-click-data", get(contact_click_data))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_guard));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/service-providers", get(discover_providers))
        .route("/api/service-providers/:id/contact", post(contact_provider))
        .route("/api/filter-options", get(filter_options))
        .merge(dashboards)
        .merge(provider_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Discovery dashboard for service seekers
pub async fn user_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    QueryParams(filter): QueryParams<DiscoveryFilter>,
) -> ApiResult<impl IntoResponse> {
    let filter_options = state.provider_repository.filter_options().await?;
    let service_providers = state.provider_repository.discover(&filter).await?;

    Ok(Json(json!({
        "user": { "name": user.name, "email": user.email },
        "filterOptions": filter_options,
        "serviceProviders": service_providers,
    })))
}

/// Profile, services and gallery of the logged-in provider
pub async fn service_provider_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .provider_repository
        .profile(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service provider not found".to_string()))?;
    let services = state.catalog_repository.list_services(user.id).await?;
    let images = state.catalog_repository.list_images(user.id).await?;

    Ok(Json(json!({
        "profile": profile,
        "services": services,
        "images": images,
    })))
}

/// Account totals for the admin console
pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<impl IntoResponse> {
    let counts = state.admin_repository.account_counts().await?;

    Ok(Json(json!({
        "user": { "name": user.name, "email": user.email },
        "counts": counts,
    })))
}

/// Public provider discovery
pub async fn discover_providers(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<DiscoveryFilter>,
) -> ApiResult<impl IntoResponse> {
    let providers = state.provider_repository.discover(&filter).await?;
    Ok(Json(providers))
}

/// Record a contact click and reveal the provider's phone number
pub async fn contact_provider(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let phone_number = state
        .provider_repository
        .record_contact(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service provider not found".to_string()))?;

    Ok(Json(ContactResponse { phone_number }))
}

pub async fn filter_options(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let options = state.provider_repository.filter_options().await?;
    Ok(Json(options))
}

pub async fn list_services(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<impl IntoResponse> {
    let services = state.catalog_repository.list_services(user.id).await?;
    Ok(Json(services))
}

pub async fn create_service(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    JsonBody(payload): JsonBody<ServiceNameRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = required_service_name(&payload)?;
    let service = state.catalog_repository.create_service(user.id, name).await?;

    Ok((StatusCode::CREATED, Json(service)))
}

/// Rename one of the provider's services; reports how many rows changed
pub async fn rename_service(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<ServiceNameRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = required_service_name(&payload)?;
    let count = state
        .catalog_repository
        .rename_service(user.id, id, name)
        .await?;

    Ok(Json(json!({ "count": count })))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.catalog_repository.delete_service(user.id, id).await?;
    Ok(Json(json!({ "message": "Service deleted" })))
}

pub async fn list_images(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<impl IntoResponse> {
    let images = state.catalog_repository.list_images(user.id).await?;
    Ok(Json(images))
}

pub async fn add_image(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    JsonBody(payload): JsonBody<ImageRequest>,
) -> ApiResult<impl IntoResponse> {
    let url = validate_image_url(payload.url.as_deref())?;
    let image = state.catalog_repository.add_image(user.id, url).await?;

    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn provider_profile(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .provider_repository
        .profile(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service provider not found".to_string()))?;

    Ok(Json(profile))
}

pub async fn admin_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.admin_repository.list_users().await?;
    Ok(Json(users))
}

pub async fn admin_service_providers(
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let providers = state.admin_repository.list_service_providers().await?;
    Ok(Json(providers))
}

pub async fn admin_user_action(
    State(state): State<AppState>,
    Extension(admin): Extension<SessionUser>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<AdminActionRequest>,
) -> ApiResult<impl IntoResponse> {
    apply_admin_action(&state, &admin, AccountTable::Users, id, &payload).await
}

pub async fn admin_service_provider_action(
    State(state): State<AppState>,
    Extension(admin): Extension<SessionUser>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<AdminActionRequest>,
) -> ApiResult<impl IntoResponse> {
    apply_admin_action(&state, &admin, AccountTable::ServiceProviders, id, &payload).await
}

pub async fn registration_data(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let points = state.admin_repository.registration_data().await?;
    Ok(Json(points))
}

pub async fn contact_click_data(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let points = state.admin_repository.contact_click_data().await?;
    Ok(Json(points))
}

async fn apply_admin_action(
    state: &AppState,
    admin: &SessionUser,
    table: AccountTable,
    id: Uuid,
    payload: &AdminActionRequest,
) -> ApiResult<Json<serde_json::Value>> {
    let action: AdminAction = payload.action.parse().map_err(ApiError::BadRequest)?;

    let found = match action.target_status() {
        Some(status) => state.admin_repository.set_status(table, id, status).await?,
        None => state.admin_repository.delete(table, id).await?,
    };

    if !found {
        let what = match table {
            AccountTable::Users => "User",
            AccountTable::ServiceProviders => "Service provider",
        };
        return Err(ApiError::NotFound(format!("{} not found", what)));
    }

    info!(admin_id = %admin.id, account_id = %id, ?action, "Admin action applied");
    Ok(Json(json!({ "message": "Action applied", "action": payload.action })))
}

fn required_service_name(payload: &ServiceNameRequest) -> ApiResult<&str> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Service name is required".to_string()));
    }
    Ok(name)
}

/// Accept only absolute http(s) image URLs
fn validate_image_url(url: Option<&str>) -> ApiResult<&str> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No image provided".to_string()))?;

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| ApiError::BadRequest("Image URL must use http or https".to_string()))?;

    if rest.is_empty() || rest.starts_with('/') || rest.chars().any(char::is_whitespace) {
        return Err(ApiError::BadRequest("Invalid image URL".to_string()));
    }

    Ok(url)
}
