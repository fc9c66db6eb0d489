use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only ledger of subscribe actions. Plan columns keep their ids even
/// after the plan is removed from the catalog, so they carry no foreign key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "subscription_transaction")]
#[schema(as = SubscriptionTransactionModel)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub sub_transaction_id: i32,
    pub user_id: i32,
    pub old_plan_id: Option<i32>,
    pub new_plan_id: i32,
    pub payment_method: String,
    #[sea_orm(column_type = "Double")]
    pub amount_paid: f64,
    #[schema(value_type = String, format = DateTime)]
    pub transaction_date: DateTimeUtc,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
