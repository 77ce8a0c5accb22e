//! Turns a raw catalog product record into the decoration methods, colours
//! and sizes an admin can pick from when pricing a line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::{
    decoration,
    price_breaks::{PriceBreak, PriceBreaks},
};

pub const AS_COLOUR: &str = "AS Colour";

const SIZE_DETAIL_NAMES: [&str; 4] = ["sizing", "sizes", "size", "product sizes"];
const DEFAULT_SIZES: [&str; 6] = ["XS", "S", "M", "L", "XL", "2XL"];

/// (key, description) of the methods offered for every clothing product.
const CLOTHING_METHODS: [(&str, &str); 5] = [
    ("pocket-front-print", "Pocket Front Print"),
    ("pocket-embroidery", "Pocket Embroidery"),
    ("big-back-print", "Big Back Print"),
    ("pocket-big-print", "Pocket + Big Print"),
    ("unbranded", "Unbranded"),
];

// ---- upstream record -------------------------------------------------------

/// Product record as served by `GET /single-product/:id`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    #[serde(alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub category: Option<CatalogCategory>,
    #[serde(default, alias = "colors")]
    pub colours: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub details: Vec<ProductDetail>,
    #[serde(default)]
    pub price_groups: Vec<PriceGroup>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ProductDetail {
    pub name: String,
    #[serde(default, alias = "detail")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceGroup {
    #[serde(default)]
    pub base_price: Option<CatalogPrice>,
    #[serde(default)]
    pub additions: Vec<CatalogPrice>,
}

/// A priced decoration entry; base prices usually carry no key.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPrice {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub setup: Decimal,
    #[serde(default)]
    pub price_breaks: Vec<CatalogPriceBreak>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct CatalogPriceBreak {
    #[serde(alias = "quantity")]
    pub qty: u32,
    pub price: Decimal,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

impl CatalogPrice {
    fn breaks(&self) -> PriceBreaks {
        PriceBreaks::new(
            self.price_breaks
                .iter()
                .map(|b| PriceBreak::new(b.qty, b.price))
                .collect(),
        )
    }
}

impl CatalogProduct {
    pub fn is_clothing(&self) -> bool {
        self.category
            .as_ref()
            .and_then(|c| c.group_name.as_deref())
            .is_some_and(|group| group.trim().eq_ignore_ascii_case("clothing"))
    }

    fn base_price(&self) -> Option<&CatalogPrice> {
        self.price_groups.first().and_then(|g| g.base_price.as_ref())
    }
}

// ---- resolved options ------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Sets the unit price outright.
    Base,
    /// Surcharge on top of the base method's unit price.
    Addition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DecorationMethod {
    pub key: String,
    pub description: String,
    pub kind: MethodKind,
    pub setup_fee: Decimal,
    pub price_breaks: PriceBreaks,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductOptions {
    pub product_id: String,
    pub product_name: String,
    pub supplier: Option<String>,
    pub image: Option<String>,
    pub is_clothing: bool,
    pub methods: Vec<DecorationMethod>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

impl ProductOptions {
    pub fn method(&self, key: &str) -> Option<&DecorationMethod> {
        self.methods.iter().find(|m| m.key == key)
    }

    /// The method whose first break supplies the unit price for additions.
    pub fn base_method(&self) -> Option<&DecorationMethod> {
        self.methods.iter().find(|m| m.kind == MethodKind::Base)
    }
}

pub fn resolve(product: &CatalogProduct) -> ProductOptions {
    let is_clothing = product.is_clothing();
    let methods = if is_clothing {
        clothing_methods(product)
    } else {
        catalog_methods(product)
    };

    ProductOptions {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        supplier: product.supplier.clone(),
        image: product.images.first().cloned(),
        is_clothing,
        methods,
        colors: unique_colours(&product.colours),
        sizes: if is_clothing {
            extract_sizes(&product.details)
        } else {
            Vec::new()
        },
    }
}

fn clothing_methods(product: &CatalogProduct) -> Vec<DecorationMethod> {
    let breaks = product.base_price().map(CatalogPrice::breaks).unwrap_or_default();
    let skip_unbranded = product.supplier.as_deref() == Some(AS_COLOUR);

    CLOTHING_METHODS
        .iter()
        .filter(|(key, _)| !(skip_unbranded && *key == "unbranded"))
        .map(|(key, description)| DecorationMethod {
            key: (*key).to_string(),
            description: (*description).to_string(),
            kind: MethodKind::Base,
            setup_fee: decoration::setup_fee(description),
            price_breaks: breaks.clone(),
        })
        .collect()
}

fn catalog_methods(product: &CatalogProduct) -> Vec<DecorationMethod> {
    let mut methods = Vec::new();

    if let Some(base) = product.base_price() {
        methods.push(DecorationMethod {
            key: base.key.clone().unwrap_or_else(|| "base".to_string()),
            description: base
                .description
                .clone()
                .unwrap_or_else(|| "Base price".to_string()),
            kind: MethodKind::Base,
            setup_fee: base.setup,
            price_breaks: base.breaks(),
        });
    }

    let additions = product.price_groups.iter().flat_map(|g| g.additions.iter());
    for (index, addition) in additions.enumerate() {
        methods.push(DecorationMethod {
            key: addition
                .key
                .clone()
                .unwrap_or_else(|| format!("addition-{index}")),
            description: addition.description.clone().unwrap_or_default(),
            kind: MethodKind::Addition,
            setup_fee: addition.setup,
            price_breaks: addition.breaks(),
        });
    }

    methods
}

fn unique_colours(colours: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for colour in colours.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        if !seen.iter().any(|s| s == colour) {
            seen.push(colour.to_string());
        }
    }
    seen
}

pub fn extract_sizes(details: &[ProductDetail]) -> Vec<String> {
    let listed = details
        .iter()
        .find(|d| {
            let name = d.name.trim().to_lowercase();
            SIZE_DETAIL_NAMES.contains(&name.as_str())
        })
        .map(|d| split_sizes(&d.value))
        .unwrap_or_default();

    if listed.len() < 2 {
        return DEFAULT_SIZES.iter().map(|s| s.to_string()).collect();
    }
    listed
}

fn split_sizes(value: &str) -> Vec<String> {
    let separator = if value.contains(',') { "," } else { " | " };
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn price(qty: u32, price: Decimal) -> CatalogPriceBreak {
        CatalogPriceBreak { qty, price }
    }

    fn tee(supplier: &str) -> CatalogProduct {
        CatalogProduct {
            id: "tee-1".into(),
            name: "Staple Tee".into(),
            supplier: Some(supplier.into()),
            category: Some(CatalogCategory {
                name: Some("T-Shirts".into()),
                group_name: Some("Clothing".into()),
            }),
            colours: vec!["Black".into(), "White".into(), "Black".into(), " ".into()],
            images: vec!["https://cdn.example/tee.png".into()],
            details: vec![ProductDetail {
                name: "Sizes".into(),
                value: "S, M, L, XL".into(),
            }],
            price_groups: vec![PriceGroup {
                base_price: Some(CatalogPrice {
                    price_breaks: vec![price(50, dec!(9)), price(25, dec!(10))],
                    ..Default::default()
                }),
                additions: vec![],
            }],
        }
    }

    fn pen() -> CatalogProduct {
        CatalogProduct {
            id: "pen-7".into(),
            name: "Metal Pen".into(),
            supplier: Some("Trends".into()),
            category: Some(CatalogCategory {
                name: Some("Pens".into()),
                group_name: Some("Writing".into()),
            }),
            price_groups: vec![
                PriceGroup {
                    base_price: Some(CatalogPrice {
                        key: Some("pad-print".into()),
                        description: Some("Pad print 1 colour".into()),
                        setup: dec!(55),
                        price_breaks: vec![price(100, dec!(5)), price(250, dec!(4.5))],
                    }),
                    additions: vec![CatalogPrice {
                        key: Some("engrave".into()),
                        description: Some("Laser engraving".into()),
                        setup: dec!(40),
                        price_breaks: vec![price(100, dec!(3))],
                    }],
                },
                PriceGroup {
                    base_price: None,
                    additions: vec![CatalogPrice {
                        key: Some("gift-box".into()),
                        description: Some("Gift box".into()),
                        setup: Decimal::ZERO,
                        price_breaks: vec![price(1, dec!(1.2))],
                    }],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn clothing_gets_static_methods_with_base_breaks() {
        let options = resolve(&tee("Gildan"));
        assert!(options.is_clothing);
        let keys: Vec<&str> = options.methods.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "pocket-front-print",
                "pocket-embroidery",
                "big-back-print",
                "pocket-big-print",
                "unbranded"
            ]
        );
        for method in &options.methods {
            assert_eq!(method.price_breaks.lowest().unwrap().quantity, 25);
        }
        assert_eq!(options.method("pocket-embroidery").unwrap().setup_fee, dec!(49));
        assert_eq!(options.method("pocket-big-print").unwrap().setup_fee, dec!(49));
    }

    #[test]
    fn as_colour_drops_unbranded() {
        let options = resolve(&tee(AS_COLOUR));
        assert_eq!(options.methods.len(), 4);
        assert!(options.method("unbranded").is_none());

        // exact match only
        let options = resolve(&tee("as colour"));
        assert!(options.method("unbranded").is_some());
    }

    #[test]
    fn colours_are_deduplicated_in_first_seen_order() {
        assert_eq!(resolve(&tee("Gildan")).colors, vec!["Black", "White"]);
    }

    #[test]
    fn non_clothing_flattens_additions_in_source_order() {
        let options = resolve(&pen());
        assert!(!options.is_clothing);
        assert!(options.sizes.is_empty());

        let summary: Vec<(&str, MethodKind)> = options
            .methods
            .iter()
            .map(|m| (m.key.as_str(), m.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("pad-print", MethodKind::Base),
                ("engrave", MethodKind::Addition),
                ("gift-box", MethodKind::Addition),
            ]
        );
        assert_eq!(options.base_method().unwrap().setup_fee, dec!(55));
    }

    #[test]
    fn sizes_split_on_comma_or_pipe() {
        assert_eq!(resolve(&tee("Gildan")).sizes, vec!["S", "M", "L", "XL"]);

        let details = vec![ProductDetail {
            name: "Product Sizes".into(),
            value: "S | M | L".into(),
        }];
        assert_eq!(extract_sizes(&details), vec!["S", "M", "L"]);
    }

    #[test]
    fn sizes_fall_back_to_defaults() {
        let single = vec![ProductDetail {
            name: "sizing".into(),
            value: "One size".into(),
        }];
        assert_eq!(extract_sizes(&single), DEFAULT_SIZES.to_vec());
        assert_eq!(extract_sizes(&[]), DEFAULT_SIZES.to_vec());
    }

    #[test]
    fn catalog_record_deserializes_from_camel_case() {
        let product: CatalogProduct = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Cap",
            "category": { "groupName": "clothing" },
            "priceGroups": [{
                "basePrice": { "priceBreaks": [{ "qty": 10, "price": 7.5 }] },
                "additions": []
            }]
        }))
        .unwrap();
        assert_eq!(product.id, "42");
        assert!(product.is_clothing());
        assert_eq!(resolve(&product).methods[0].price_breaks.lowest().unwrap().unit_price, dec!(7.5));
    }
}
