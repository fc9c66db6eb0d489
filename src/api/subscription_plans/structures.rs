use serde::Deserialize;
use utoipa::ToSchema;

/// Body of both create and update; on update absent keys stay untouched.
#[derive(Deserialize, ToSchema, Clone, Debug, Default)]
pub struct PlanDto {
    pub plan_name: Option<String>,
    pub price: Option<f64>,
    pub duration_in_months: Option<i32>,
    pub description: Option<String>,
}
