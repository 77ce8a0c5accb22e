use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::pricing::{DiscountKind, LineItem, quote::GroupTotal};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Customer {
    #[validate(length(min = 1, message = "customer name is required"))]
    pub name: String,
    #[validate(email(message = "customer email is invalid"))]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Admin who assembled the quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Creator {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Which price columns the customer-facing quote shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DisplayOptions {
    pub show_unit_prices: bool,
    pub show_line_subtotals: bool,
    pub show_group_totals: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_unit_prices: true,
            show_line_subtotals: true,
            show_group_totals: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AppliedDiscount {
    pub kind: DiscountKind,
    pub value: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Quote {
    pub id: Uuid,
    pub reference: String,
    pub customer: Customer,
    pub created_by: Creator,
    #[schema(value_type = Object)]
    pub company_details: serde_json::Value,
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub discount: AppliedDiscount,
    pub total: Decimal,
    pub deadline: Option<NaiveDate>,
    pub display: DisplayOptions,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteSummary {
    pub id: Uuid,
    pub reference: String,
    pub customer: Customer,
    pub total: Decimal,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Priced draft that has not been persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuotePreview {
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub discount: AppliedDiscount,
    pub total: Decimal,
    pub group_totals: Vec<GroupTotal>,
}
