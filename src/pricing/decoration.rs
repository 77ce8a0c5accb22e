//! Extra unit cost and setup fee for decorating apparel.
//!
//! Rules are checked top to bottom and the first match wins. The order is
//! part of the pricing contract: "Pocket + Big Back Print" resolves through
//! the big-back rule before the pocket-and-big combo is ever considered.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DecorationCost {
    pub additional_cost: Decimal,
    pub setup_fee: Decimal,
}

impl DecorationCost {
    pub const NONE: DecorationCost = DecorationCost {
        additional_cost: Decimal::ZERO,
        setup_fee: Decimal::ZERO,
    };
}

struct Rule {
    all_of: &'static [&'static str],
    cost: DecorationCost,
}

const RULES: [Rule; 5] = [
    Rule {
        all_of: &["pocket", "front", "print"],
        cost: DecorationCost {
            additional_cost: dec!(8),
            setup_fee: dec!(29),
        },
    },
    Rule {
        all_of: &["pocket", "embroidery"],
        cost: DecorationCost {
            additional_cost: dec!(8),
            setup_fee: dec!(49),
        },
    },
    Rule {
        all_of: &["big", "back"],
        cost: DecorationCost {
            additional_cost: dec!(10),
            setup_fee: dec!(29),
        },
    },
    Rule {
        all_of: &["pocket", "big"],
        cost: DecorationCost {
            additional_cost: dec!(15),
            setup_fee: dec!(49),
        },
    },
    Rule {
        all_of: &["unbranded"],
        cost: DecorationCost::NONE,
    },
];

pub fn lookup(description: &str) -> DecorationCost {
    let description = description.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.all_of.iter().all(|phrase| description.contains(phrase)))
        .map(|rule| rule.cost)
        .unwrap_or(DecorationCost::NONE)
}

pub fn additional_cost(description: &str) -> Decimal {
    lookup(description).additional_cost
}

pub fn setup_fee(description: &str) -> Decimal {
    lookup(description).setup_fee
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rule_matches_its_phrases() {
        assert_eq!(additional_cost("Pocket Front Print"), dec!(8));
        assert_eq!(setup_fee("Pocket Front Print"), dec!(29));
        assert_eq!(setup_fee("pocket EMBROIDERY"), dec!(49));
        assert_eq!(additional_cost("Big Back Print"), dec!(10));
        assert_eq!(lookup("Pocket + Big Print").additional_cost, dec!(15));
        assert_eq!(lookup("Pocket + Big Print").setup_fee, dec!(49));
        assert_eq!(lookup("Unbranded"), DecorationCost::NONE);
        assert_eq!(lookup("Sublimation"), DecorationCost::NONE);
    }

    #[test]
    fn big_back_wins_over_pocket_big_combo() {
        let cost = lookup("Pocket + Big Back Print");
        assert_eq!(cost.additional_cost, dec!(10));
        assert_eq!(cost.setup_fee, dec!(29));
    }

    #[test]
    fn pocket_front_print_wins_even_with_big_back_words() {
        let cost = lookup("Pocket front print with big back");
        assert_eq!(cost.additional_cost, dec!(8));
        assert_eq!(cost.setup_fee, dec!(29));
    }

    #[test]
    fn matching_is_substring_based() {
        // "bigger" and "backpack" still contain the phrases
        assert_eq!(additional_cost("bigger backpack"), dec!(10));
    }
}
