use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::models::{
    financial_aid_subscription, subscription_plan, subscription_transaction,
};

#[derive(Deserialize, ToSchema, Clone)]
pub struct SubscribeDto {
    pub plan_id: Option<i32>,
}

/// Subscription row with its plan attached.
#[derive(Serialize, ToSchema, Clone, Debug)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub subscription: financial_aid_subscription::Model,
    /// Active and not past `end_date` at the time of the request
    pub is_current: bool,
    pub subscription_plan: Option<subscription_plan::Model>,
}

#[derive(Serialize, ToSchema, Clone, Debug)]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: subscription_transaction::Model,
    pub old_plan: Option<subscription_plan::Model>,
    pub new_plan: Option<subscription_plan::Model>,
}

#[derive(Debug)]
pub struct SubscribeOutcome {
    pub subscription: SubscriptionView,
    pub transaction: subscription_transaction::Model,
    pub message: String,
}
