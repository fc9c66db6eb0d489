use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "users")]
#[schema(as = UserModel)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    // bcrypt hash, never leaves the server
    #[serde(skip_serializing, default)]
    pub password: String,
    pub status: String,
    pub systemrole_id: i32,
    // Owning facility of a beneficiary. No FK: facilities reference users too.
    pub financial_aid_id: Option<i32>,
    pub age: Option<i32>,
    pub enrolled_school: Option<String>,
    pub school_year: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeUtc,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::system_role::Entity",
        from = "Column::SystemroleId",
        to = "super::system_role::Column::Id"
    )]
    SystemRole,
}

impl Related<super::system_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SystemRole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
