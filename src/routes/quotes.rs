use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::quotes::{QuoteList, SaveQuoteRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Quote,
    response::ApiResponse,
    routes::params::QuoteListQuery,
    services::quote_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotes))
        .route("/add-quote", post(add_quote))
        .route("/update-quote/{id}", put(update_quote))
        .route("/get-quote/{id}", get(get_quote))
        .route("/delete-quote/{id}", delete(delete_quote))
}

#[utoipa::path(
    get,
    path = "/api/admin-quotes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search reference or customer"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "List quotes", body = ApiResponse<QuoteList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn list_quotes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<QuoteListQuery>,
) -> AppResult<Json<ApiResponse<QuoteList>>> {
    let resp = quote_service::list_quotes(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin-quotes/add-quote",
    request_body = SaveQuoteRequest,
    responses(
        (status = 200, description = "Quote created", body = ApiResponse<Quote>),
        (status = 400, description = "Invalid pricing input"),
        (status = 422, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn add_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SaveQuoteRequest>,
) -> AppResult<Json<ApiResponse<Quote>>> {
    let resp = quote_service::create_quote(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin-quotes/update-quote/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote ID")
    ),
    request_body = SaveQuoteRequest,
    responses(
        (status = 200, description = "Quote replaced", body = ApiResponse<Quote>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn update_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveQuoteRequest>,
) -> AppResult<Json<ApiResponse<Quote>>> {
    let resp = quote_service::update_quote(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin-quotes/get-quote/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote ID")
    ),
    responses(
        (status = 200, description = "Quote with line items", body = ApiResponse<Quote>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn get_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Quote>>> {
    let resp = quote_service::get_quote(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin-quotes/delete-quote/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote ID")
    ),
    responses(
        (status = 200, description = "Deleted quote"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn delete_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = quote_service::delete_quote(&state, &user, id).await?;
    Ok(Json(resp))
}
