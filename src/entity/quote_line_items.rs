use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quote_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub quote_id: Uuid,
    pub position: i32,
    pub product_id: Option<String>,
    pub name: String,
    pub image: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub decoration_method: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub decoration_price: Decimal,
    pub setup_fee: Decimal,
    pub subtotal: Decimal,
    pub description: String,
    pub group_tag: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotes::Entity",
        from = "Column::QuoteId",
        to = "super::quotes::Column::Id"
    )]
    Quotes,
}

impl Related<super::quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
