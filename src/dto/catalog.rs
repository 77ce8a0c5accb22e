use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductSearchQuery {
    #[validate(length(min = 1, message = "search term is required"))]
    pub q: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerSearchQuery {
    #[validate(length(min = 1, message = "search term is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerDetailQuery {
    #[validate(email(message = "email is invalid"))]
    pub email: String,
}

/// Price one catalog line item the way the quote builder would.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PriceLineItemRequest {
    #[validate(length(min = 1, message = "product id is required"))]
    pub product_id: String,
    #[validate(length(min = 1, message = "decoration method is required"))]
    pub method_key: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub decoration_price: Option<Decimal>,
    #[serde(default)]
    pub setup_fee: Option<Decimal>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImage {
    pub url: String,
}
