pub mod financial_aid;
pub mod financial_aid_document;
pub mod financial_aid_subscription;
pub mod subscription_plan;
pub mod subscription_transaction;
pub mod system_role;
pub mod user;
