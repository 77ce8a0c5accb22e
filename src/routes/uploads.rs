use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};

use crate::{
    dto::catalog::UploadedImage,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/image", post(upload_image))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
}

#[utoipa::path(
    post,
    path = "/api/uploads/image",
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 200, description = "Hosted image URL", body = ApiResponse<UploadedImage>),
        (status = 400, description = "Missing or non-image file"),
        (status = 502, description = "Image host unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadedImage>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let resp =
            catalog_service::upload_image(&state, &user, &filename, &content_type, bytes.to_vec())
                .await?;
        return Ok(Json(resp));
    }

    Err(AppError::BadRequest("multipart field `file` is required".into()))
}
