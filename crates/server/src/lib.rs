//! In-memory activities service speaking the roster client's HTTP protocol.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use shared::{
    error::{ApiFailure, DetailBody},
    protocol::{activities_route, participants_route, signup_route, EmailQuery, MessageBody},
};
use tracing::warn;

pub mod api;
pub mod config;
pub mod store;

use api::ApiContext;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiContext,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<DetailBody>)>;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(activities_route(), get(http_list_activities))
        .route(signup_route(), post(http_signup))
        .route(participants_route(), delete(http_unregister))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_activities(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = api::list_activities(&state.api).await;
    ([(header::CACHE_CONTROL, "no-store")], Json(snapshot))
}

async fn http_signup(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> ApiResult<MessageBody> {
    let Query(query) = query.map_err(missing_email)?;
    api::signup(&state.api, &activity_name, &query.email)
        .await
        .map(Json)
        .map_err(|failure| rejection(&activity_name, &query.email, failure))
}

async fn http_unregister(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> ApiResult<MessageBody> {
    let Query(query) = query.map_err(missing_email)?;
    api::unregister(&state.api, &activity_name, &query.email)
        .await
        .map(Json)
        .map_err(|failure| rejection(&activity_name, &query.email, failure))
}

fn missing_email(rejection: QueryRejection) -> (StatusCode, Json<DetailBody>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(DetailBody::new(rejection.body_text())),
    )
}

fn rejection(
    activity_name: &str,
    email: &str,
    failure: ApiFailure,
) -> (StatusCode, Json<DetailBody>) {
    warn!(activity = activity_name, email, %failure, "request rejected");
    let status = StatusCode::from_u16(failure.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(DetailBody::from(failure)))
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
