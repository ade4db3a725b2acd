use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cashback_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub master_data_id: Uuid,
    pub amount: i64,
    pub payment_date: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::master_data::Entity",
        from = "Column::MasterDataId",
        to = "super::master_data::Column::Id"
    )]
    MasterData,
}

impl Related<super::master_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MasterData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
