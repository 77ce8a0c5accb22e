use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrorsKind;

use crate::{
    clients::ClientError,
    pricing::{ItemValidation, PricingError},
    response::{ApiResponse, Meta},
};

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Upstream service unavailable")]
    Upstream(#[from] ClientError),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ItemValidation> for AppError {
    fn from(err: ItemValidation) -> Self {
        AppError::Validation(
            err.0
                .into_iter()
                .map(|e| FieldViolation {
                    field: e.field().to_string(),
                    message: e.to_string(),
                })
                .collect(),
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations = Vec::new();
        flatten_validation("", &errors, &mut violations);
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(violations)
    }
}

/// Nested structs and lists become dotted / indexed paths, e.g.
/// `line_items[0].quantity`.
fn flatten_validation(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<FieldViolation>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldViolation {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{path} is invalid")),
                }));
            }
            ValidationErrorsKind::Struct(inner) => flatten_validation(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_validation(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldViolation>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Upstream(ClientError::Api { status: 404, .. }) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::DbError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::OrmError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            AppError::Upstream(err) => tracing::error!(error = %err, "upstream request failed"),
            AppError::DbError(err) => tracing::error!(error = %err, "database error"),
            AppError::OrmError(err) => tracing::error!(error = %err, "orm error"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
            _ => {}
        }

        let message = match &self {
            AppError::Upstream(err) if err.is_not_found() => AppError::NotFound.to_string(),
            _ => self.to_string(),
        };
        let fields = match self {
            AppError::Validation(fields) => fields,
            _ => Vec::new(),
        };

        let body = ApiResponse {
            success: false,
            message: message.clone(),
            data: Some(ErrorData {
                error: message,
                fields,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::FieldError;

    #[test]
    fn status_codes_follow_error_kind() {
        let validation: AppError = ItemValidation(vec![FieldError::InvalidQuantity]).into();
        assert_eq!(
            validation.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let missing = AppError::Upstream(ClientError::Api {
            status: 404,
            body: String::new(),
        });
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let down = AppError::Upstream(ClientError::Api {
            status: 503,
            body: "maintenance".into(),
        });
        assert_eq!(down.into_response().status(), StatusCode::BAD_GATEWAY);

        let token = AppError::Unauthorized("Invalid or expired token".into());
        assert_eq!(token.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn item_validation_names_each_field() {
        let err: AppError =
            ItemValidation(vec![FieldError::MissingName, FieldError::InvalidQuantity]).into();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["name", "quantity"]);
    }
}
