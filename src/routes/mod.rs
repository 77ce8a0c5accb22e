use axum::Router;

use crate::state::AppState;

pub mod catalog;
pub mod doc;
pub mod health;
pub mod params;
pub mod pricing;
pub mod quotes;
pub mod uploads;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/admin-quotes", quotes::router())
        .nest("/pricing", pricing::router())
        .nest("/catalog", catalog::router())
        .nest("/customers", catalog::customers_router())
        .nest("/uploads", uploads::router())
}
