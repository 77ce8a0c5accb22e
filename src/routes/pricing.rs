use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::{catalog::PriceLineItemRequest, quotes::PriceQuoteRequest},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::QuotePreview,
    pricing::LineItem,
    response::ApiResponse,
    services::{catalog_service, quote_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(price_quote))
        .route("/line-item", post(price_line_item))
}

#[utoipa::path(
    post,
    path = "/api/pricing/quote",
    request_body = PriceQuoteRequest,
    responses(
        (status = 200, description = "Priced draft quote", body = ApiResponse<QuotePreview>),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pricing"
)]
pub async fn price_quote(
    user: AuthUser,
    Json(payload): Json<PriceQuoteRequest>,
) -> AppResult<Json<ApiResponse<QuotePreview>>> {
    ensure_admin(&user)?;
    let resp = quote_service::price_quote(payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/pricing/line-item",
    request_body = PriceLineItemRequest,
    responses(
        (status = 200, description = "Priced catalog line item", body = ApiResponse<LineItem>),
        (status = 404, description = "Product not found"),
        (status = 502, description = "Catalog unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pricing"
)]
pub async fn price_line_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PriceLineItemRequest>,
) -> AppResult<Json<ApiResponse<LineItem>>> {
    let resp = catalog_service::price_line_item(&state, &user, payload).await?;
    Ok(Json(resp))
}
