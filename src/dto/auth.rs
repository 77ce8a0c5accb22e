use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims issued by the platform's auth service.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
