use std::collections::HashSet;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::quotes::{PriceQuoteRequest, QuoteList, SaveQuoteRequest},
    entity::{
        quote_line_items::{
            ActiveModel as ItemActive, Column as ItemCol, Entity as QuoteLineItems,
            Model as ItemModel,
        },
        quotes::{ActiveModel as QuoteActive, Column as QuoteCol, Entity as Quotes, Model as QuoteModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{AppliedDiscount, Creator, Quote, QuotePreview, QuoteSummary},
    pricing::{DiscountKind, LineItem, QuoteBuilder},
    response::{ApiResponse, Meta},
    routes::params::{QuoteListQuery, SortOrder},
    state::AppState,
};

/// Validate a submission and price it with the aggregator. Client-computed
/// money fields are never trusted.
fn prepare(payload: &SaveQuoteRequest) -> AppResult<QuoteBuilder> {
    payload.validate()?;
    let builder = payload.to_builder()?;

    let totals = builder.totals();
    let drifted = payload.subtotal.is_some_and(|s| s != totals.subtotal)
        || payload.total.is_some_and(|t| t != totals.total)
        || payload.discount.amount.is_some_and(|a| a != totals.discount_amount);
    if drifted {
        tracing::warn!(
            reference = %payload.reference,
            client_subtotal = ?payload.subtotal,
            client_total = ?payload.total,
            subtotal = %totals.subtotal,
            total = %totals.total,
            "client totals disagree with server pricing, using server values"
        );
    }
    Ok(builder)
}

fn applied_discount(builder: &QuoteBuilder) -> AppliedDiscount {
    let discount = builder.discount();
    AppliedDiscount {
        kind: discount.kind,
        value: discount.value,
        amount: builder.discount_amount(),
    }
}

pub fn price_quote(payload: PriceQuoteRequest) -> AppResult<ApiResponse<QuotePreview>> {
    payload.validate()?;
    let builder = payload.to_builder()?;
    let preview = QuotePreview {
        subtotal: builder.subtotal(),
        discount: applied_discount(&builder),
        total: builder.total(),
        group_totals: builder.group_totals(),
        line_items: builder.into_items(),
    };
    Ok(ApiResponse::success("Quote priced", preview, Some(Meta::empty())))
}

pub async fn create_quote(
    state: &AppState,
    user: &AuthUser,
    payload: SaveQuoteRequest,
) -> AppResult<ApiResponse<Quote>> {
    ensure_admin(user)?;
    let builder = prepare(&payload)?;

    // item ids are primary keys; new quotes never reuse client ids
    let items: Vec<LineItem> = builder
        .items()
        .iter()
        .cloned()
        .map(|mut item| {
            item.id = Uuid::new_v4();
            item
        })
        .collect();

    let quote_id = Uuid::new_v4();
    let totals = builder.totals();
    let discount = builder.discount();
    let created_by = payload.created_by.clone().unwrap_or_else(|| Creator {
        id: Some(user.user_id.to_string()),
        ..Default::default()
    });

    let txn = state.orm.begin().await?;
    let quote = QuoteActive {
        id: Set(quote_id),
        reference: Set(payload.reference.trim().to_string()),
        customer: Set(to_json(&payload.customer)?),
        created_by: Set(to_json(&created_by)?),
        company_details: Set(payload.company_details.clone()),
        subtotal: Set(totals.subtotal),
        discount_kind: Set(discount.kind.as_str().to_string()),
        discount_value: Set(discount.value),
        discount_amount: Set(totals.discount_amount),
        total: Set(totals.total),
        deadline: Set(payload.deadline),
        display: Set(to_json(&payload.display)?),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;
    let items = insert_items(&txn, quote.id, &items).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "quote_create",
        "quotes",
        serde_json::json!({ "quote_id": quote.id, "total": quote.total }),
    )
    .await;

    Ok(ApiResponse::success(
        "Quote created",
        quote_from_entity(quote, items)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_quote(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: SaveQuoteRequest,
) -> AppResult<ApiResponse<Quote>> {
    ensure_admin(user)?;
    let builder = prepare(&payload)?;

    let txn = state.orm.begin().await?;
    let existing = Quotes::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let existing = match existing {
        Some(q) => q,
        None => return Err(AppError::NotFound),
    };

    let owned: HashSet<Uuid> = QuoteLineItems::find()
        .filter(ItemCol::QuoteId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| item.id)
        .collect();
    // ids the quote already owns survive the replace; anything else is fresh
    let items: Vec<LineItem> = builder
        .items()
        .iter()
        .cloned()
        .map(|mut item| {
            if !owned.contains(&item.id) {
                item.id = Uuid::new_v4();
            }
            item
        })
        .collect();

    let totals = builder.totals();
    let discount = builder.discount();
    let created_by = match &payload.created_by {
        Some(creator) => to_json(creator)?,
        None => existing.created_by.clone(),
    };

    let mut active: QuoteActive = existing.into();
    active.reference = Set(payload.reference.trim().to_string());
    active.customer = Set(to_json(&payload.customer)?);
    active.created_by = Set(created_by);
    active.company_details = Set(payload.company_details.clone());
    active.subtotal = Set(totals.subtotal);
    active.discount_kind = Set(discount.kind.as_str().to_string());
    active.discount_value = Set(discount.value);
    active.discount_amount = Set(totals.discount_amount);
    active.total = Set(totals.total);
    active.deadline = Set(payload.deadline);
    active.display = Set(to_json(&payload.display)?);
    active.updated_at = Set(Utc::now().into());
    let quote = active.update(&txn).await?;

    QuoteLineItems::delete_many()
        .filter(ItemCol::QuoteId.eq(id))
        .exec(&txn)
        .await?;
    let items = insert_items(&txn, quote.id, &items).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "quote_update",
        "quotes",
        serde_json::json!({ "quote_id": quote.id, "total": quote.total }),
    )
    .await;

    Ok(ApiResponse::success(
        "Quote updated",
        quote_from_entity(quote, items)?,
        Some(Meta::empty()),
    ))
}

pub async fn get_quote(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Quote>> {
    ensure_admin(user)?;
    let quote = Quotes::find_by_id(id).one(&state.orm).await?;
    let quote = match quote {
        Some(q) => q,
        None => return Err(AppError::NotFound),
    };

    let items = QuoteLineItems::find()
        .filter(ItemCol::QuoteId.eq(quote.id))
        .order_by_asc(ItemCol::Position)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Quote found",
        quote_from_entity(quote, items)?,
        Some(Meta::empty()),
    ))
}

pub async fn list_quotes(
    state: &AppState,
    user: &AuthUser,
    query: QuoteListQuery,
) -> AppResult<ApiResponse<QuoteList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::cust_with_values("reference ILIKE $1", [pattern.clone()]))
                .add(Expr::cust_with_values("customer ->> 'name' ILIKE $1", [pattern.clone()]))
                .add(Expr::cust_with_values("customer ->> 'email' ILIKE $1", [pattern])),
        );
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Quotes::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(QuoteCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(QuoteCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(summary_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Quotes", QuoteList { items }, Some(meta)))
}

pub async fn delete_quote(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    QuoteLineItems::delete_many()
        .filter(ItemCol::QuoteId.eq(id))
        .exec(&txn)
        .await?;
    let result = Quotes::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "quote_delete",
        "quotes",
        serde_json::json!({ "quote_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    quote_id: Uuid,
    items: &[LineItem],
) -> AppResult<Vec<LineItem>> {
    let mut saved = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let model = ItemActive {
            id: Set(item.id),
            quote_id: Set(quote_id),
            position: Set(position as i32),
            product_id: Set(item.product_id.clone()),
            name: Set(item.name.clone()),
            image: Set(item.image.clone()),
            color: Set(item.color.clone()),
            size: Set(item.size.clone()),
            decoration_method: Set(item.decoration_method.clone()),
            quantity: Set(to_db_quantity(item.quantity)?),
            unit_price: Set(item.unit_price),
            decoration_price: Set(item.decoration_price),
            setup_fee: Set(item.setup_fee),
            subtotal: Set(item.subtotal),
            description: Set(item.description.clone()),
            group_tag: Set(item.group.clone()),
            created_at: NotSet,
        }
        .insert(conn)
        .await?;
        saved.push(item_from_entity(model)?);
    }
    Ok(saved)
}

fn to_db_quantity(quantity: u32) -> AppResult<i32> {
    i32::try_from(quantity).map_err(|_| AppError::BadRequest("quantity is too large".into()))
}

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}

fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value, column: &str) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("corrupt quotes.{column} column: {e}"))
    })
}

fn item_from_entity(model: ItemModel) -> AppResult<LineItem> {
    let quantity = u32::try_from(model.quantity).map_err(|_| {
        AppError::Internal(anyhow::anyhow!("negative quantity on item {}", model.id))
    })?;
    Ok(LineItem {
        id: model.id,
        product_id: model.product_id,
        name: model.name,
        image: model.image,
        color: model.color,
        size: model.size,
        decoration_method: model.decoration_method,
        quantity,
        unit_price: model.unit_price,
        decoration_price: model.decoration_price,
        setup_fee: model.setup_fee,
        subtotal: model.subtotal,
        description: model.description,
        group: model.group_tag,
    })
}

fn discount_kind(model: &QuoteModel) -> AppResult<DiscountKind> {
    DiscountKind::parse(&model.discount_kind).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "unknown discount kind {} on quote {}",
            model.discount_kind,
            model.id
        ))
    })
}

fn quote_from_entity(model: QuoteModel, line_items: Vec<LineItem>) -> AppResult<Quote> {
    let kind = discount_kind(&model)?;
    Ok(Quote {
        id: model.id,
        reference: model.reference,
        customer: from_json(model.customer, "customer")?,
        created_by: from_json(model.created_by, "created_by")?,
        company_details: model.company_details,
        line_items,
        subtotal: model.subtotal,
        discount: AppliedDiscount {
            kind,
            value: model.discount_value,
            amount: model.discount_amount,
        },
        total: model.total,
        deadline: model.deadline,
        display: from_json(model.display, "display")?,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn summary_from_entity(model: QuoteModel) -> AppResult<QuoteSummary> {
    Ok(QuoteSummary {
        id: model.id,
        reference: model.reference,
        customer: from_json(model.customer, "customer")?,
        total: model.total,
        deadline: model.deadline,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::quotes::{DiscountInput, LineItemInput};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn item(name: &str, quantity: u32, unit_price: Decimal) -> LineItemInput {
        LineItemInput {
            id: None,
            product_id: None,
            name: name.into(),
            image: None,
            color: None,
            size: None,
            decoration_method: None,
            quantity,
            unit_price,
            decoration_price: Decimal::ZERO,
            setup_fee: Decimal::ZERO,
            subtotal: None,
            description: String::new(),
            group: None,
        }
    }

    fn preview(items: Vec<LineItemInput>) -> AppResult<ApiResponse<QuotePreview>> {
        price_quote(PriceQuoteRequest {
            line_items: items,
            discount: DiscountInput::default(),
        })
    }

    #[test]
    fn blank_item_names_block_pricing() {
        let err = preview(vec![item("   ", 1, dec!(4))]).unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(fields[0].field, "line_items[0].name");
    }

    #[test]
    fn huge_prices_are_a_bad_request() {
        let err = preview(vec![item("Tee", 2, Decimal::MAX)]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn preview_prices_valid_items() {
        let resp = preview(vec![item("Tee", 3, dec!(4.50))]).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data.subtotal, dec!(13.50));
        assert_eq!(data.total, dec!(13.50));
    }
}
