use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One step of a quantity price table: ordering at least `quantity` units
/// costs `unit_price` each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceBreak {
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl PriceBreak {
    pub fn new(quantity: u32, unit_price: Decimal) -> Self {
        Self {
            quantity,
            unit_price,
        }
    }
}

/// Price breaks kept sorted ascending by quantity.
///
/// The applicable break for a quantity is the one with the greatest
/// threshold not exceeding it; quantities below every threshold fall back
/// to the lowest break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "Vec<PriceBreak>", into = "Vec<PriceBreak>")]
#[schema(value_type = Vec<PriceBreak>)]
pub struct PriceBreaks(Vec<PriceBreak>);

impl PriceBreaks {
    pub fn new(mut breaks: Vec<PriceBreak>) -> Self {
        // stable, so equal thresholds keep catalog order
        breaks.sort_by_key(|b| b.quantity);
        Self(breaks)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceBreak> {
        self.0.iter()
    }

    pub fn lowest(&self) -> Option<PriceBreak> {
        self.0.first().copied()
    }

    pub fn for_quantity(&self, quantity: u32) -> Option<PriceBreak> {
        let lowest = self.lowest()?;
        Some(
            self.0
                .iter()
                .rev()
                .find(|b| b.quantity <= quantity)
                .copied()
                .unwrap_or(lowest),
        )
    }
}

impl From<Vec<PriceBreak>> for PriceBreaks {
    fn from(breaks: Vec<PriceBreak>) -> Self {
        Self::new(breaks)
    }
}

impl From<PriceBreaks> for Vec<PriceBreak> {
    fn from(breaks: PriceBreaks) -> Self {
        breaks.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn table() -> PriceBreaks {
        PriceBreaks::new(vec![
            PriceBreak::new(100, dec!(8.50)),
            PriceBreak::new(25, dec!(10.00)),
            PriceBreak::new(50, dec!(9.25)),
        ])
    }

    #[test]
    fn breaks_are_sorted_on_construction() {
        let quantities: Vec<u32> = table().iter().map(|b| b.quantity).collect();
        assert_eq!(quantities, vec![25, 50, 100]);
        assert_eq!(table().lowest(), Some(PriceBreak::new(25, dec!(10.00))));
    }

    #[test]
    fn quantity_picks_highest_threshold_not_exceeding_it() {
        let breaks = table();
        assert_eq!(breaks.for_quantity(25).unwrap().unit_price, dec!(10.00));
        assert_eq!(breaks.for_quantity(49).unwrap().unit_price, dec!(10.00));
        assert_eq!(breaks.for_quantity(50).unwrap().unit_price, dec!(9.25));
        assert_eq!(breaks.for_quantity(99).unwrap().unit_price, dec!(9.25));
        assert_eq!(breaks.for_quantity(5000).unwrap().unit_price, dec!(8.50));
    }

    #[test]
    fn quantity_below_every_threshold_uses_lowest_break() {
        assert_eq!(table().for_quantity(1).unwrap().quantity, 25);
    }

    #[test]
    fn step_function_holds_for_every_quantity() {
        let breaks = table();
        for q in 0..300u32 {
            let chosen = breaks.for_quantity(q).unwrap();
            let qualifying = breaks.iter().filter(|b| b.quantity <= q).map(|b| b.quantity).max();
            match qualifying {
                Some(threshold) => assert_eq!(chosen.quantity, threshold),
                None => assert_eq!(chosen.quantity, 25),
            }
        }
    }

    #[test]
    fn empty_table_has_no_break() {
        assert_eq!(PriceBreaks::default().for_quantity(10), None);
    }

    #[test]
    fn deserializing_sorts_breaks() {
        let breaks: PriceBreaks = serde_json::from_str(
            r#"[{"quantity":50,"unit_price":"9"},{"quantity":10,"unit_price":"12"}]"#,
        )
        .unwrap();
        assert_eq!(breaks.lowest().unwrap().quantity, 10);
    }
}
