use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult, FieldViolation},
    models::{Creator, Customer, DisplayOptions, QuoteSummary},
    pricing::{
        Discount, DiscountKind, LineItem, PricingError, QuoteBuilder, check_amount,
        check_quantity, line_item,
    },
};

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

/// Line item as submitted by the console. Derived fields are optional and
/// recomputed on the server.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LineItemInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[validate(length(min = 1, message = "product name is required"))]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub decoration_method: Option<String>,
    #[validate(range(min = 1, message = "quantity must be a whole number of at least 1"))]
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub decoration_price: Decimal,
    #[serde(default)]
    pub setup_fee: Decimal,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub group: Option<String>,
}

impl LineItemInput {
    pub fn into_line_item(self) -> Result<LineItem, PricingError> {
        check_amount("unit_price", self.unit_price)?;
        check_amount("decoration_price", self.decoration_price)?;
        check_amount("setup_fee", self.setup_fee)?;
        check_quantity(self.quantity)?;

        let mut item = LineItem {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            product_id: self.product_id,
            name: self.name.trim().to_string(),
            image: self.image,
            color: self.color,
            size: self.size,
            decoration_method: self.decoration_method,
            quantity: self.quantity,
            unit_price: self.unit_price,
            decoration_price: self.decoration_price,
            setup_fee: self.setup_fee,
            subtotal: Decimal::ZERO,
            description: self.description,
            group: self.group,
        };
        item.recompute();
        Ok(item)
    }
}

impl From<&LineItem> for LineItemInput {
    fn from(item: &LineItem) -> Self {
        Self {
            id: Some(item.id),
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            color: item.color.clone(),
            size: item.size.clone(),
            decoration_method: item.decoration_method.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            decoration_price: item.decoration_price,
            setup_fee: item.setup_fee,
            subtotal: Some(item.subtotal),
            description: item.description.clone(),
            group: item.group.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct DiscountInput {
    #[serde(default)]
    pub kind: DiscountKind,
    #[serde(default)]
    pub value: Decimal,
    /// Amount computed by the client; informational only.
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// Convert submitted items into a priced builder. Items go through the same
/// commit validation as the item editor; every failing field is reported
/// under its indexed path, e.g. `line_items[2].name`.
fn build(items: Vec<LineItemInput>, discount: DiscountInput) -> AppResult<QuoteBuilder> {
    let mut seen = HashSet::new();
    let mut violations = Vec::new();
    let mut line_items = Vec::with_capacity(items.len());
    for (index, input) in items.into_iter().enumerate() {
        let item = input.into_line_item()?;
        if let Err(invalid) = line_item::validate(&item) {
            violations.extend(invalid.0.iter().map(|e| FieldViolation {
                field: format!("line_items[{index}].{}", e.field()),
                message: e.to_string(),
            }));
        }
        if !seen.insert(item.id) {
            return Err(PricingError::DuplicateItem(item.id).into());
        }
        line_items.push(item);
    }
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    Ok(QuoteBuilder::from_parts(
        line_items,
        Discount::new(discount.kind, discount.value)?,
    ))
}

/// Body of `add-quote` and `update-quote`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SaveQuoteRequest {
    #[validate(nested)]
    pub customer: Customer,
    #[serde(default)]
    pub created_by: Option<Creator>,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub company_details: serde_json::Value,
    #[validate(length(min = 1, message = "at least one line item is required"), nested)]
    pub line_items: Vec<LineItemInput>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub discount: DiscountInput,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[validate(length(min = 1, max = 120, message = "reference is required"))]
    pub reference: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub display: DisplayOptions,
}

/// Everything on a submitted quote besides its items and money.
#[derive(Debug, Clone)]
pub struct QuoteMeta {
    pub customer: Customer,
    pub created_by: Option<Creator>,
    pub company_details: serde_json::Value,
    pub reference: String,
    pub deadline: Option<NaiveDate>,
    pub display: DisplayOptions,
}

impl SaveQuoteRequest {
    /// Assemble the submission body from a priced builder.
    pub fn from_builder(builder: &QuoteBuilder, meta: QuoteMeta) -> Self {
        let totals = builder.totals();
        let discount = builder.discount();
        Self {
            customer: meta.customer,
            created_by: meta.created_by,
            company_details: meta.company_details,
            line_items: builder.items().iter().map(LineItemInput::from).collect(),
            subtotal: Some(totals.subtotal),
            discount: DiscountInput {
                kind: discount.kind,
                value: discount.value,
                amount: Some(totals.discount_amount),
            },
            total: Some(totals.total),
            reference: meta.reference,
            deadline: meta.deadline,
            display: meta.display,
        }
    }

    pub fn to_builder(&self) -> AppResult<QuoteBuilder> {
        build(self.line_items.clone(), self.discount)
    }
}

/// Body of the pricing preview: items and discount only.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PriceQuoteRequest {
    #[validate(nested)]
    pub line_items: Vec<LineItemInput>,
    #[serde(default)]
    pub discount: DiscountInput,
}

impl PriceQuoteRequest {
    pub fn to_builder(&self) -> AppResult<QuoteBuilder> {
        build(self.line_items.clone(), self.discount)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteList {
    pub items: Vec<QuoteSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(name: &str, quantity: u32) -> LineItemInput {
        LineItemInput {
            id: None,
            product_id: None,
            name: name.into(),
            image: None,
            color: None,
            size: None,
            decoration_method: None,
            quantity,
            unit_price: dec!(10),
            decoration_price: dec!(2),
            setup_fee: dec!(29),
            subtotal: Some(dec!(1)),
            description: String::new(),
            group: None,
        }
    }

    fn request(items: Vec<LineItemInput>) -> SaveQuoteRequest {
        SaveQuoteRequest {
            customer: Customer {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                company: None,
                phone: None,
            },
            created_by: None,
            company_details: empty_object(),
            line_items: items,
            subtotal: None,
            discount: DiscountInput::default(),
            total: None,
            reference: "Q-1".into(),
            deadline: None,
            display: DisplayOptions::default(),
        }
    }

    #[test]
    fn submitted_subtotals_are_recomputed() {
        let builder = request(vec![input("Tee", 50)]).to_builder().unwrap();
        assert_eq!(builder.items()[0].subtotal, dec!(629));
    }

    #[test]
    fn validation_flags_each_bad_field() {
        let errors = request(vec![input("", 0)]).validate().unwrap_err();
        let rendered = errors.to_string();
        assert!(rendered.contains("name"));
        assert!(rendered.contains("quantity"));

        assert!(request(vec![]).validate().is_err());
        assert!(request(vec![input("Tee", 1)]).validate().is_ok());
    }

    #[test]
    fn negative_prices_are_rejected() {
        let mut bad = input("Tee", 1);
        bad.setup_fee = dec!(-5);
        assert_eq!(
            bad.into_line_item(),
            Err(PricingError::NegativeAmount("setup_fee"))
        );
    }

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let id = Uuid::new_v4();
        let mut a = input("A", 1);
        a.id = Some(id);
        let mut b = input("B", 1);
        b.id = Some(id);
        let err = request(vec![a, b]).to_builder().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains(&id.to_string())));
    }

    #[test]
    fn whitespace_names_fail_commit_validation() {
        let req = request(vec![input("Tee", 1), input("   ", 2)]);
        // passes the length check, trimmed to empty afterwards
        assert!(req.validate().is_ok());

        let err = req.to_builder().unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "line_items[1].name");
    }

    #[test]
    fn oversized_amounts_are_rejected_before_pricing() {
        let mut huge = input("Tee", 2);
        huge.unit_price = Decimal::MAX;
        assert_eq!(
            huge.into_line_item(),
            Err(PricingError::AmountTooLarge("unit_price"))
        );

        let mut many = input("Tee", u32::MAX);
        many.unit_price = dec!(1);
        assert_eq!(many.into_line_item(), Err(PricingError::QuantityTooLarge));

        let mut req = request(vec![input("Tee", 1)]);
        req.line_items[0].setup_fee = Decimal::MAX;
        assert!(matches!(req.to_builder(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn payload_round_trips_through_builder() {
        let mut builder = request(vec![input("Tee", 50)]).to_builder().unwrap();
        builder
            .set_discount(DiscountKind::Percentage, dec!(10))
            .unwrap();

        let meta = QuoteMeta {
            customer: request(vec![]).customer,
            created_by: None,
            company_details: empty_object(),
            reference: "Q-2".into(),
            deadline: None,
            display: DisplayOptions::default(),
        };
        let payload = SaveQuoteRequest::from_builder(&builder, meta);
        assert_eq!(payload.subtotal, Some(dec!(629)));
        assert_eq!(payload.discount.amount, Some(dec!(62.90)));
        assert_eq!(payload.total, Some(dec!(566.10)));

        let rebuilt = payload.to_builder().unwrap();
        assert_eq!(rebuilt.items(), builder.items());
        assert_eq!(rebuilt.totals(), builder.totals());
    }
}
