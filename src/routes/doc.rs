use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    clients::catalog::{CustomerRecord, CustomerSuggestion, ProductSuggestion},
    dto::{
        catalog::{PriceLineItemRequest, UploadedImage},
        quotes::{DiscountInput, LineItemInput, PriceQuoteRequest, QuoteList, SaveQuoteRequest},
    },
    error::FieldViolation,
    models::{AppliedDiscount, Creator, Customer, DisplayOptions, Quote, QuotePreview, QuoteSummary},
    pricing::{
        DecorationMethod, DiscountKind, LineItem, MethodKind, PriceBreak, ProductOptions,
        quote::GroupTotal,
    },
    response::{ApiResponse, Meta},
    routes::{catalog, health, params, pricing, quotes, uploads},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        quotes::list_quotes,
        quotes::add_quote,
        quotes::update_quote,
        quotes::get_quote,
        quotes::delete_quote,
        pricing::price_quote,
        pricing::price_line_item,
        catalog::search_products,
        catalog::product_options,
        catalog::search_customers,
        catalog::customer_detail,
        uploads::upload_image
    ),
    components(
        schemas(
            Quote,
            QuoteSummary,
            QuotePreview,
            QuoteList,
            Customer,
            Creator,
            DisplayOptions,
            AppliedDiscount,
            DiscountKind,
            LineItem,
            GroupTotal,
            LineItemInput,
            DiscountInput,
            SaveQuoteRequest,
            PriceQuoteRequest,
            PriceLineItemRequest,
            ProductOptions,
            DecorationMethod,
            MethodKind,
            PriceBreak,
            ProductSuggestion,
            CustomerSuggestion,
            CustomerRecord,
            UploadedImage,
            FieldViolation,
            health::HealthData,
            params::Pagination,
            params::SortOrder,
            params::QuoteListQuery,
            Meta,
            ApiResponse<Quote>,
            ApiResponse<QuoteList>,
            ApiResponse<QuotePreview>,
            ApiResponse<LineItem>,
            ApiResponse<ProductOptions>,
            ApiResponse<UploadedImage>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Quotes", description = "Saved quote endpoints"),
        (name = "Pricing", description = "Stateless pricing endpoints"),
        (name = "Catalog", description = "Catalog product lookups"),
        (name = "Customers", description = "Customer lookups"),
        (name = "Uploads", description = "Image upload endpoint"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
