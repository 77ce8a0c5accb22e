use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reference: String,
    pub customer: Json,
    pub created_by: Json,
    pub company_details: Json,
    pub subtotal: Decimal,
    pub discount_kind: String,
    pub discount_value: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub deadline: Option<Date>,
    pub display: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quote_line_items::Entity")]
    QuoteLineItems,
}

impl Related<super::quote_line_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteLineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
