use validator::Validate;

use crate::{
    audit,
    clients::catalog::{CustomerRecord, CustomerSuggestion, ProductSuggestion},
    dto::catalog::{
        CustomerDetailQuery, CustomerSearchQuery, PriceLineItemRequest, ProductSearchQuery,
        UploadedImage,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    pricing::{
        ItemEditor, LineItem, ProductOptions, QuoteBuilder, catalog, check_amount, check_quantity,
    },
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn search_products(
    state: &AppState,
    user: &AuthUser,
    query: ProductSearchQuery,
) -> AppResult<ApiResponse<Vec<ProductSuggestion>>> {
    ensure_admin(user)?;
    query.validate()?;
    let items = state.catalog.search_products(query.q.trim()).await?;
    Ok(ApiResponse::success("Products", items, Some(Meta::empty())))
}

async fn fetch_options(state: &AppState, product_id: &str) -> AppResult<ProductOptions> {
    if matches!(product_id.trim(), "" | "." | "..") {
        return Err(AppError::BadRequest("invalid product id".into()));
    }
    let product = state.catalog.product_detail(product_id).await.map_err(|err| {
        if err.is_not_found() {
            AppError::NotFound
        } else {
            err.into()
        }
    })?;
    let options = catalog::resolve(&product);
    tracing::debug!(
        product_id,
        clothing = options.is_clothing,
        methods = options.methods.len(),
        "resolved product options"
    );
    Ok(options)
}

pub async fn product_options(
    state: &AppState,
    user: &AuthUser,
    product_id: &str,
) -> AppResult<ApiResponse<ProductOptions>> {
    ensure_admin(user)?;
    let options = fetch_options(state, product_id).await?;
    Ok(ApiResponse::success("Product options", options, Some(Meta::empty())))
}

/// Run the item editor over a catalog product: select the method, apply the
/// quantity, then any manual price overrides.
pub fn price_with_options(
    options: ProductOptions,
    payload: &PriceLineItemRequest,
) -> AppResult<LineItem> {
    // upstream prices feed the same arithmetic as submitted ones
    for method in [options.method(&payload.method_key), options.base_method()]
        .into_iter()
        .flatten()
    {
        check_amount("setup_fee", method.setup_fee)?;
        for brk in method.price_breaks.iter() {
            check_amount("unit_price", brk.unit_price)?;
            check_quantity(brk.quantity)?;
        }
    }

    let mut editor = ItemEditor::for_product(options);
    editor.select_method(&payload.method_key)?;
    if let Some(quantity) = payload.quantity {
        editor.change_quantity(check_quantity(quantity)?);
    }
    if let Some(unit_price) = payload.unit_price {
        editor.set_unit_price(check_amount("unit_price", unit_price)?);
    }
    if let Some(decoration_price) = payload.decoration_price {
        editor.set_decoration_price(check_amount("decoration_price", decoration_price)?);
    }
    if let Some(setup_fee) = payload.setup_fee {
        editor.set_setup_fee(check_amount("setup_fee", setup_fee)?);
    }
    if payload.color.is_some() {
        editor.set_color(payload.color.clone());
    }
    if payload.size.is_some() {
        editor.set_size(payload.size.clone());
    }
    if let Some(description) = &payload.description {
        editor.set_description(description.clone());
    }
    editor.set_group(payload.group.clone());

    let mut scratch = QuoteBuilder::new();
    let id = editor.commit(&mut scratch)?;
    scratch
        .remove(id)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("committed item {id} went missing")))
}

pub async fn price_line_item(
    state: &AppState,
    user: &AuthUser,
    payload: PriceLineItemRequest,
) -> AppResult<ApiResponse<LineItem>> {
    ensure_admin(user)?;
    payload.validate()?;
    let options = fetch_options(state, &payload.product_id).await?;
    let item = price_with_options(options, &payload)?;
    Ok(ApiResponse::success("Line item priced", item, Some(Meta::empty())))
}

pub async fn search_customers(
    state: &AppState,
    user: &AuthUser,
    query: CustomerSearchQuery,
) -> AppResult<ApiResponse<Vec<CustomerSuggestion>>> {
    ensure_admin(user)?;
    query.validate()?;
    let items = state.catalog.search_customers(query.name.trim()).await?;
    Ok(ApiResponse::success("Customers", items, Some(Meta::empty())))
}

pub async fn customer_detail(
    state: &AppState,
    user: &AuthUser,
    query: CustomerDetailQuery,
) -> AppResult<ApiResponse<CustomerRecord>> {
    ensure_admin(user)?;
    query.validate()?;
    let customer = state
        .catalog
        .customer_detail(query.email.trim(), &user.token)
        .await?;
    match customer {
        Some(c) => Ok(ApiResponse::success("Customer", c, Some(Meta::empty()))),
        None => Err(AppError::NotFound),
    }
}

pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    filename: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> AppResult<ApiResponse<UploadedImage>> {
    ensure_admin(user)?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("image file is empty".into()));
    }
    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest("only image uploads are accepted".into()));
    }

    let size = bytes.len();
    let url = state.images.upload(filename, content_type, bytes).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "image_upload",
        "images",
        serde_json::json!({ "url": url, "bytes": size }),
    )
    .await;

    Ok(ApiResponse::success(
        "Image uploaded",
        UploadedImage { url },
        Some(Meta::empty()),
    ))
}
