use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::database::models::{financial_aid, financial_aid_document, user};

/// Reference to an already stored document file.
#[derive(Deserialize, ToSchema, Clone, Debug)]
pub struct DocumentDto {
    #[serde(rename = "type")]
    pub document_type: Option<String>,
    pub path: Option<String>,
}

#[derive(Deserialize, ToSchema, Clone, Debug, Default)]
pub struct RegisterFacilityDto {
    /// Optional explicit center id; generated as `FAC-XXXXXXXX` when omitted
    pub center_id: Option<String>,
    pub center_name: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub description: Option<String>,
    pub documents: Option<Vec<DocumentDto>>,
}

/// Partial update: absent keys stay untouched, explicit `null` clears nullable fields.
#[derive(Deserialize, ToSchema, Clone, Debug, Default)]
pub struct UpdateFacilityDto {
    pub center_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<f64>)]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<f64>)]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Deserialize, ToSchema, Clone, Debug)]
pub struct FacilityStatusDto {
    #[serde(rename = "isManagable")]
    pub is_managable: Option<bool>,
}

#[derive(Serialize, ToSchema, Clone, Debug)]
pub struct FacilityView {
    #[serde(flatten)]
    pub facility: financial_aid::Model,
    pub owner: Option<user::Model>,
    pub documents: Vec<financial_aid_document::Model>,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
