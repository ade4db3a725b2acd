use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "areas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub purchase_amount: i64,
    pub paid_amount: i64,
    pub due_amount: i64,
    pub cashback_amount: i64,
    pub package_quantity: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::master_data::Entity")]
    MasterData,
}

impl Related<super::master_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MasterData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
