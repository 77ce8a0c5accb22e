use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{PricingError, check_amount, line_item::LineItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    #[default]
    Fixed,
    Percentage,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Fixed => "fixed",
            DiscountKind::Percentage => "percentage",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fixed" => Some(DiscountKind::Fixed),
            "percentage" => Some(DiscountKind::Percentage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Discount {
    pub kind: DiscountKind,
    pub value: Decimal,
}

impl Discount {
    pub fn new(kind: DiscountKind, value: Decimal) -> Result<Self, PricingError> {
        let value = check_amount("discount.value", value)?;
        if kind == DiscountKind::Percentage && value > Decimal::ONE_HUNDRED {
            return Err(PricingError::PercentageTooLarge);
        }
        Ok(Self { kind, value })
    }

    /// Amount taken off `subtotal`; may exceed it, the total floors at zero.
    pub fn amount(&self, subtotal: Decimal) -> Decimal {
        match self.kind {
            DiscountKind::Percentage => subtotal * self.value / Decimal::ONE_HUNDRED,
            DiscountKind::Fixed => self.value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GroupTotal {
    pub group: Option<String>,
    pub items: usize,
    pub subtotal: Decimal,
}

pub fn total_after_discount(subtotal: Decimal, discount_amount: Decimal) -> Decimal {
    (subtotal - discount_amount).max(Decimal::ZERO)
}

/// Ordered line items plus the discount applied to them.
///
/// Totals are derived on every read rather than cached.
#[derive(Debug, Clone, Default)]
pub struct QuoteBuilder {
    items: Vec<LineItem>,
    discount: Discount,
}

impl QuoteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(items: Vec<LineItem>, discount: Discount) -> Self {
        Self { items, discount }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn item(&self, id: Uuid) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Replace the item with the same id, keeping its position, or append.
    pub fn upsert(&mut self, mut item: LineItem) -> Uuid {
        item.recompute();
        let id = item.id;
        match self.items.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn set_discount(&mut self, kind: DiscountKind, value: Decimal) -> Result<(), PricingError> {
        self.discount = Discount::new(kind, value)?;
        Ok(())
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|item| item.subtotal).sum()
    }

    pub fn discount_amount(&self) -> Decimal {
        self.discount.amount(self.subtotal())
    }

    pub fn total(&self) -> Decimal {
        total_after_discount(self.subtotal(), self.discount_amount())
    }

    pub fn totals(&self) -> QuoteTotals {
        let subtotal = self.subtotal();
        let discount_amount = self.discount.amount(subtotal);
        QuoteTotals {
            subtotal,
            discount_amount,
            total: total_after_discount(subtotal, discount_amount),
        }
    }

    /// Subtotals per group tag in order of first appearance; untagged items
    /// share the `None` group.
    pub fn group_totals(&self) -> Vec<GroupTotal> {
        let mut groups: Vec<GroupTotal> = Vec::new();
        for item in &self.items {
            match groups.iter_mut().find(|g| g.group == item.group) {
                Some(group) => {
                    group.items += 1;
                    group.subtotal += item.subtotal;
                }
                None => groups.push(GroupTotal {
                    group: item.group.clone(),
                    items: 1,
                    subtotal: item.subtotal,
                }),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(subtotal_parts: (Decimal, Decimal, u32, Decimal), group: Option<&str>) -> LineItem {
        let (unit_price, decoration_price, quantity, setup_fee) = subtotal_parts;
        let mut item = LineItem {
            id: Uuid::new_v4(),
            product_id: None,
            name: "Item".into(),
            image: None,
            color: None,
            size: None,
            decoration_method: None,
            quantity,
            unit_price,
            decoration_price,
            setup_fee,
            subtotal: Decimal::ZERO,
            description: String::new(),
            group: group.map(str::to_string),
        };
        item.recompute();
        item
    }

    #[test]
    fn percentage_discount_scenario() {
        let mut quote = QuoteBuilder::new();
        quote.upsert(item((dec!(10.00), dec!(2.00), 50, dec!(29)), None));
        quote
            .set_discount(DiscountKind::Percentage, dec!(10))
            .unwrap();

        assert_eq!(quote.subtotal(), dec!(629.00));
        assert_eq!(quote.discount_amount(), dec!(62.90));
        assert_eq!(quote.total(), dec!(566.10));
    }

    #[test]
    fn fixed_discount_larger_than_subtotal_floors_total_at_zero() {
        let mut quote = QuoteBuilder::new();
        quote.upsert(item((dec!(50.00), Decimal::ZERO, 1, Decimal::ZERO), None));
        quote.set_discount(DiscountKind::Fixed, dec!(100)).unwrap();

        let totals = quote.totals();
        assert_eq!(totals.subtotal, dec!(50.00));
        assert_eq!(totals.discount_amount, dec!(100));
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn totals_follow_item_list_changes() {
        let mut quote = QuoteBuilder::new();
        let a = quote.upsert(item((dec!(1), Decimal::ZERO, 10, Decimal::ZERO), None));
        quote.upsert(item((dec!(2), Decimal::ZERO, 10, Decimal::ZERO), None));
        quote.set_discount(DiscountKind::Percentage, dec!(50)).unwrap();
        assert_eq!(quote.total(), dec!(15));

        quote.remove(a).unwrap();
        assert_eq!(quote.subtotal(), dec!(20));
        assert_eq!(quote.total(), dec!(10));
        assert!(quote.remove(a).is_none());
    }

    #[test]
    fn upsert_recomputes_stale_subtotal() {
        let mut stale = item((dec!(3), dec!(1), 10, dec!(5)), None);
        stale.subtotal = dec!(1);
        let mut quote = QuoteBuilder::new();
        let id = quote.upsert(stale);
        assert_eq!(quote.item(id).unwrap().subtotal, dec!(45));
    }

    #[test]
    fn negative_discount_is_rejected() {
        let mut quote = QuoteBuilder::new();
        assert_eq!(
            quote.set_discount(DiscountKind::Fixed, dec!(-1)),
            Err(PricingError::NegativeAmount("discount.value"))
        );
        assert_eq!(quote.discount(), Discount::default());
    }

    #[test]
    fn oversized_discounts_are_rejected() {
        assert_eq!(
            Discount::new(DiscountKind::Percentage, dec!(100.5)),
            Err(PricingError::PercentageTooLarge)
        );
        assert_eq!(
            Discount::new(DiscountKind::Fixed, Decimal::MAX),
            Err(PricingError::AmountTooLarge("discount.value"))
        );
        assert!(Discount::new(DiscountKind::Percentage, dec!(100)).is_ok());
    }

    #[test]
    fn group_totals_keep_first_seen_order() {
        let mut quote = QuoteBuilder::new();
        quote.upsert(item((dec!(1), Decimal::ZERO, 1, Decimal::ZERO), Some("Staff")));
        quote.upsert(item((dec!(2), Decimal::ZERO, 1, Decimal::ZERO), None));
        quote.upsert(item((dec!(3), Decimal::ZERO, 1, Decimal::ZERO), Some("Staff")));

        let groups = quote.group_totals();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group.as_deref(), Some("Staff"));
        assert_eq!(groups[0].items, 2);
        assert_eq!(groups[0].subtotal, dec!(4));
        assert_eq!(groups[1].group, None);
    }
}
