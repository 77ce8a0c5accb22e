pub mod quote_line_items;
pub mod quotes;

pub use quote_line_items::Entity as QuoteLineItems;
pub use quotes::Entity as Quotes;
