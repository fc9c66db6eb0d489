use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::database::models::{financial_aid, user};

pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 100;

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u64>,
    /// Items per page, at most 100
    pub per_page: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }
}

#[derive(Deserialize, ToSchema, Clone, Debug, Default)]
pub struct CreateBeneficiaryDto {
    pub firstname: Option<String>,
    pub middlename: Option<String>,
    pub lastname: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub age: Option<i32>,
    pub enrolled_school: Option<String>,
    pub school_year: Option<String>,
}

/// Partial update: absent keys stay untouched, explicit `null` clears nullable fields.
#[derive(Deserialize, ToSchema, Clone, Debug, Default)]
pub struct UpdateBeneficiaryDto {
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub middlename: Option<Option<String>>,
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub contact_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    pub email: Option<String>,
    /// Only changed when supplied together with `password_confirmation`
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub age: Option<i32>,
    pub enrolled_school: Option<String>,
    pub school_year: Option<String>,
    /// `active` or `inactive`
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema, Clone, Debug)]
pub struct BeneficiaryPage {
    pub items: Vec<user::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub last_page: u64,
    pub facility: financial_aid::Model,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
