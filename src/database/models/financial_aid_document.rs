use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "financial_aid_documents")]
#[schema(as = FacilityDocumentModel)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub financial_aid_id: i32,
    pub document_type: String,
    pub document_path: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::financial_aid::Entity",
        from = "Column::FinancialAidId",
        to = "super::financial_aid::Column::Id",
        on_delete = "Cascade"
    )]
    FinancialAid,
}

impl Related<super::financial_aid::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialAid.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
