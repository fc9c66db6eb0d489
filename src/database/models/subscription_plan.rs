use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "subscription_plan")]
#[schema(as = SubscriptionPlanModel)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub plan_id: i32,
    #[sea_orm(unique)]
    pub plan_name: String,
    // Peso amount, two decimal places on output
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub duration_in_months: i32,
    pub description: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeUtc,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::financial_aid_subscription::Entity")]
    Subscriptions,
}

impl Related<super::financial_aid_subscription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscriptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The Free tier is granted by the system and cannot be bought.
    pub fn is_free(&self) -> bool {
        self.plan_name.trim().eq_ignore_ascii_case("free")
    }
}
