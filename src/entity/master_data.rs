use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "master_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub area_id: Uuid,
    pub name: String,
    pub nid: Option<String>,
    pub phone: Option<String>,
    pub payment_method: Option<String>,
    pub purchase_date: Date,
    pub purchase_amount: i64,
    pub paid_amount: i64,
    pub due_amount: i64,
    pub cashback_amount: i64,
    pub cashback_status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::areas::Entity",
        from = "Column::AreaId",
        to = "super::areas::Column::Id"
    )]
    Areas,
    #[sea_orm(has_many = "super::cashback_payments::Entity")]
    CashbackPayments,
}

impl Related<super::areas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Areas.def()
    }
}

impl Related<super::cashback_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashbackPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
