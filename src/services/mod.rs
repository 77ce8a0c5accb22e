pub mod catalog_service;
pub mod quote_service;
