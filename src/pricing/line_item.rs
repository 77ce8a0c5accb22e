use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    PricingError,
    catalog::{DecorationMethod, MethodKind, ProductOptions},
    decoration,
    price_breaks::PriceBreak,
    quote::QuoteBuilder,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub id: Uuid,
    /// `None` for custom items that are not backed by a catalog product.
    pub product_id: Option<String>,
    pub name: String,
    pub image: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub decoration_method: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub decoration_price: Decimal,
    pub setup_fee: Decimal,
    pub subtotal: Decimal,
    pub description: String,
    pub group: Option<String>,
}

pub fn line_subtotal(
    unit_price: Decimal,
    decoration_price: Decimal,
    quantity: u32,
    setup_fee: Decimal,
) -> Decimal {
    (unit_price + decoration_price) * Decimal::from(quantity) + setup_fee
}

impl LineItem {
    fn blank() -> Self {
        Self {
            id: Uuid::nil(),
            product_id: None,
            name: String::new(),
            image: None,
            color: None,
            size: None,
            decoration_method: None,
            quantity: 1,
            unit_price: Decimal::ZERO,
            decoration_price: Decimal::ZERO,
            setup_fee: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            description: String::new(),
            group: None,
        }
    }

    pub fn expected_subtotal(&self) -> Decimal {
        line_subtotal(
            self.unit_price,
            self.decoration_price,
            self.quantity,
            self.setup_fee,
        )
    }

    pub fn recompute(&mut self) {
        self.subtotal = self.expected_subtotal();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[error("product name is required")]
    MissingName,
    #[error("quantity must be a whole number of at least 1")]
    InvalidQuantity,
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::MissingName => "name",
            FieldError::InvalidQuantity => "quantity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line item is invalid ({} field errors)", .0.len())]
pub struct ItemValidation(pub Vec<FieldError>);

pub fn validate(item: &LineItem) -> Result<(), ItemValidation> {
    let mut errors = Vec::new();
    if item.name.trim().is_empty() {
        errors.push(FieldError::MissingName);
    }
    if item.quantity < 1 {
        errors.push(FieldError::InvalidQuantity);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ItemValidation(errors))
    }
}

/// Editing session for the line item currently being configured.
///
/// Every mutation of quantity or a price field recomputes the subtotal
/// before returning, so `item()` never exposes a stale value.
#[derive(Debug, Clone)]
pub struct ItemEditor {
    item: LineItem,
    options: Option<ProductOptions>,
    method: Option<DecorationMethod>,
    decoration_overridden: bool,
    editing: bool,
}

impl ItemEditor {
    pub fn for_product(options: ProductOptions) -> Self {
        let mut item = LineItem::blank();
        item.product_id = Some(options.product_id.clone());
        item.name = options.product_name.clone();
        item.image = options.image.clone();
        item.color = options.colors.first().cloned();
        item.size = options.sizes.first().cloned();

        Self {
            item,
            options: Some(options),
            method: None,
            decoration_overridden: false,
            editing: false,
        }
    }

    pub fn custom() -> Self {
        Self {
            item: LineItem::blank(),
            options: None,
            method: None,
            decoration_overridden: false,
            editing: false,
        }
    }

    /// Re-open an item already on the quote. `options` is the item's
    /// catalog data when it is still available.
    pub fn edit(item: LineItem, options: Option<ProductOptions>) -> Self {
        let method = options.as_ref().and_then(|opts| {
            let description = item.decoration_method.as_deref()?;
            opts.methods
                .iter()
                .find(|m| m.description == description)
                .cloned()
        });
        let decoration_overridden = match (&options, &method) {
            (Some(opts), Some(method)) if opts.is_clothing => {
                item.decoration_price != decoration::additional_cost(&method.description)
            }
            _ => false,
        };

        let mut editor = Self {
            item,
            options,
            method,
            decoration_overridden,
            editing: true,
        };
        editor.item.recompute();
        editor
    }

    pub fn item(&self) -> &LineItem {
        &self.item
    }

    pub fn options(&self) -> Option<&ProductOptions> {
        self.options.as_ref()
    }

    pub fn method(&self) -> Option<&DecorationMethod> {
        self.method.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn select_method(&mut self, key: &str) -> Result<(), PricingError> {
        let options = self.options.as_ref().ok_or(PricingError::NoProduct)?;
        let method = options
            .method(key)
            .cloned()
            .ok_or_else(|| PricingError::UnknownMethod(key.to_string()))?;
        let lowest = method
            .price_breaks
            .lowest()
            .ok_or_else(|| PricingError::NoPriceBreaks(key.to_string()))?;

        self.item.quantity = lowest.quantity;
        self.item.setup_fee = method.setup_fee;
        self.item.decoration_method = Some(method.description.clone());
        self.decoration_overridden = false;
        self.method = Some(method);
        self.apply_break(lowest);
        Ok(())
    }

    pub fn change_quantity(&mut self, quantity: u32) {
        self.item.quantity = quantity;
        let brk = self
            .method
            .as_ref()
            .and_then(|m| m.price_breaks.for_quantity(quantity));
        match brk {
            Some(brk) => self.apply_break(brk),
            None => self.item.recompute(),
        }
    }

    pub fn set_unit_price(&mut self, unit_price: Decimal) {
        self.item.unit_price = unit_price;
        self.item.recompute();
    }

    /// Manual decoration prices survive later quantity changes on apparel.
    pub fn set_decoration_price(&mut self, decoration_price: Decimal) {
        self.item.decoration_price = decoration_price;
        self.decoration_overridden = true;
        self.item.recompute();
    }

    pub fn set_setup_fee(&mut self, setup_fee: Decimal) {
        self.item.setup_fee = setup_fee;
        self.item.recompute();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.item.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.item.description = description.into();
    }

    pub fn set_color(&mut self, color: Option<String>) {
        self.item.color = color;
    }

    pub fn set_size(&mut self, size: Option<String>) {
        self.item.size = size;
    }

    pub fn set_image(&mut self, image: Option<String>) {
        self.item.image = image;
    }

    pub fn set_group(&mut self, group: Option<String>) {
        self.item.group = group;
    }

    /// Validate and write the item into `quote`: in place when editing,
    /// appended under a fresh id otherwise.
    pub fn commit(&self, quote: &mut QuoteBuilder) -> Result<Uuid, ItemValidation> {
        validate(&self.item)?;

        let mut item = self.item.clone();
        if !self.editing {
            item.id = Uuid::new_v4();
        }
        item.recompute();
        Ok(quote.upsert(item))
    }

    fn apply_break(&mut self, brk: PriceBreak) {
        let (Some(options), Some(method)) = (&self.options, &self.method) else {
            self.item.recompute();
            return;
        };

        if options.is_clothing {
            self.item.unit_price = brk.unit_price;
            if !self.decoration_overridden {
                self.item.decoration_price = decoration::additional_cost(&method.description);
            }
        } else {
            match method.kind {
                MethodKind::Base => {
                    self.item.unit_price = brk.unit_price;
                    self.item.decoration_price = Decimal::ZERO;
                }
                MethodKind::Addition => {
                    // keep the current unit price when the product has no base method
                    if let Some(base) = options.base_method().and_then(|m| m.price_breaks.lowest()) {
                        self.item.unit_price = base.unit_price;
                    }
                    self.item.decoration_price = brk.unit_price;
                }
            }
        }
        self.item.recompute();
    }
}
