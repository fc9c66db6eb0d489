use utoipa::OpenApi;

use crate::{
    api::{beneficiaries, facilities, subscription_plans, subscriptions, users},
    database::models,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users::register,
        users::current_user,
        // Facilities
        facilities::get_my_facilities,
        facilities::get_facilities,
        facilities::register_facility,
        facilities::get_facility,
        facilities::update_facility,
        facilities::update_facility_status,
        facilities::delete_facility,
        // Subscription plans
        subscription_plans::get_plans,
        subscription_plans::get_plan,
        subscription_plans::create_plan,
        subscription_plans::update_plan,
        subscription_plans::delete_plan,
        // Subscriptions
        subscriptions::get_my_subscriptions,
        subscriptions::subscribe,
        subscriptions::cancel_pending_subscription,
        subscriptions::get_transaction_history,
        // Beneficiaries
        beneficiaries::get_beneficiaries,
        beneficiaries::create_beneficiary,
        beneficiaries::get_beneficiary,
        beneficiaries::update_beneficiary,
        beneficiaries::delete_beneficiary,
    ),
    components(
        schemas(
            // --- Models ---
            models::user::Model,
            models::system_role::Model,
            models::financial_aid::Model,
            models::financial_aid_document::Model,
            models::subscription_plan::Model,
            models::financial_aid_subscription::Model,
            models::subscription_transaction::Model,

            // --- DTOs & API Structs ---
            users::RegisterUserDto,
            facilities::DocumentDto,
            facilities::RegisterFacilityDto,
            facilities::UpdateFacilityDto,
            facilities::FacilityStatusDto,
            facilities::FacilityView,
            subscription_plans::PlanDto,
            subscriptions::SubscribeDto,
            subscriptions::SubscriptionView,
            subscriptions::TransactionView,
            beneficiaries::CreateBeneficiaryDto,
            beneficiaries::UpdateBeneficiaryDto,
            beneficiaries::BeneficiaryPage
        )
    ),
    tags(
        (name = "Users", description = "Account registration and the current user"),
        (name = "Facilities", description = "Financial aid facility registration and approval"),
        (name = "Subscription Plans", description = "Subscription plan catalog"),
        (name = "Subscriptions", description = "Facility subscriptions and the transaction ledger"),
        (name = "Beneficiaries", description = "Beneficiaries enrolled in the caller's facility")
    )
)]
pub struct ApiDoc;
