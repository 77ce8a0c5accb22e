use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    clients::catalog::{CustomerRecord, CustomerSuggestion, ProductSuggestion},
    dto::catalog::{CustomerDetailQuery, CustomerSearchQuery, ProductSearchQuery},
    error::AppResult,
    middleware::auth::AuthUser,
    pricing::ProductOptions,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/search", get(search_products))
        .route("/products/{id}/options", get(product_options))
}

pub fn customers_router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_customers))
        .route("/detail", get(customer_detail))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products/search",
    params(
        ("q" = String, Query, description = "Search term")
    ),
    responses(
        (status = 200, description = "Product suggestions", body = ApiResponse<Vec<ProductSuggestion>>),
        (status = 502, description = "Catalog unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn search_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ProductSearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<ProductSuggestion>>>> {
    let resp = catalog_service::search_products(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products/{id}/options",
    params(
        ("id" = String, Path, description = "Catalog product ID")
    ),
    responses(
        (status = 200, description = "Decoration methods, colours and sizes", body = ApiResponse<ProductOptions>),
        (status = 404, description = "Product not found"),
        (status = 502, description = "Catalog unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn product_options(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductOptions>>> {
    let resp = catalog_service::product_options(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/customers/search",
    params(
        ("name" = String, Query, description = "Customer name fragment")
    ),
    responses(
        (status = 200, description = "Customer suggestions", body = ApiResponse<Vec<CustomerSuggestion>>),
        (status = 502, description = "Catalog unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn search_customers(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CustomerSearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<CustomerSuggestion>>>> {
    let resp = catalog_service::search_customers(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/customers/detail",
    params(
        ("email" = String, Query, description = "Customer email")
    ),
    responses(
        (status = 200, description = "Customer record", body = ApiResponse<CustomerRecord>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn customer_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CustomerDetailQuery>,
) -> AppResult<Json<ApiResponse<CustomerRecord>>> {
    let resp = catalog_service::customer_detail(&state, &user, query).await?;
    Ok(Json(resp))
}
