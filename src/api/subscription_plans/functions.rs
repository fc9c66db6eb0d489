use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
    Set,
};

use crate::{
    api::validation::ValidationErrors,
    database::{
        models::{financial_aid_subscription, subscription_plan},
        types::SubscriptionStatus,
    },
    errors::AppError,
};

use super::structures::PlanDto;

const MAX_PRICE: f64 = 99_999_999.99;
const MAX_DURATION_MONTHS: i32 = 600;

fn validate(dto: &PlanDto, creating: bool) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    if creating || dto.plan_name.is_some() {
        errors.required("plan_name", dto.plan_name.as_deref(), 255);
    }
    match dto.price {
        None if creating => errors.add("price", "The price field is required."),
        Some(price) => errors.range_f64("price", Some(price), 0.0, MAX_PRICE),
        None => {}
    }
    match dto.duration_in_months {
        None if creating => errors.add("duration_in_months", "The duration in months field is required."),
        Some(months) => errors.range_i32("duration_in_months", Some(months), 1, MAX_DURATION_MONTHS),
        None => {}
    }
    errors.optional("description", dto.description.as_deref(), 1000);

    errors.into_result()
}

/// Money is kept to two decimal places.
fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Case-insensitive name lookup, optionally ignoring one plan (the one being updated).
async fn name_taken(
    db: &DatabaseConnection,
    name: &str,
    except: Option<i32>,
) -> Result<bool, AppError> {
    let mut query = subscription_plan::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(subscription_plan::Column::PlanName)))
            .eq(name.to_lowercase()),
    );
    if let Some(id) = except {
        query = query.filter(subscription_plan::Column::PlanId.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<subscription_plan::Model>, AppError> {
    Ok(subscription_plan::Entity::find()
        .order_by_asc(subscription_plan::Column::PlanName)
        .all(db)
        .await?)
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<subscription_plan::Model, AppError> {
    subscription_plan::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::PlanNotFound)
}

pub async fn create(db: &DatabaseConnection, dto: PlanDto) -> Result<subscription_plan::Model, AppError> {
    validate(&dto, true)?;

    let name = dto.plan_name.unwrap_or_default().trim().to_string();
    if name_taken(db, &name, None).await? {
        return Err(AppError::DuplicatePlanName(name));
    }

    let now = Utc::now();
    let plan = subscription_plan::ActiveModel {
        plan_name: Set(name),
        price: Set(round_price(dto.price.unwrap_or_default())),
        duration_in_months: Set(dto.duration_in_months.unwrap_or(1)),
        description: Set(dto.description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Created subscription plan {} ({})", plan.plan_id, plan.plan_name);
    Ok(plan)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    dto: PlanDto,
) -> Result<subscription_plan::Model, AppError> {
    let plan = find(db, id).await?;
    validate(&dto, false)?;

    let mut active = plan.into_active_model();
    if let Some(name) = dto.plan_name {
        let name = name.trim().to_string();
        if name_taken(db, &name, Some(id)).await? {
            return Err(AppError::DuplicatePlanName(name));
        }
        active.plan_name = Set(name);
    }
    if let Some(price) = dto.price {
        active.price = Set(round_price(price));
    }
    if let Some(months) = dto.duration_in_months {
        active.duration_in_months = Set(months);
    }
    if dto.description.is_some() {
        active.description = Set(dto.description);
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Refuses while any Active subscription references the plan.
pub async fn destroy(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let plan = find(db, id).await?;

    let active_subscriptions = financial_aid_subscription::Entity::find()
        .filter(financial_aid_subscription::Column::PlanId.eq(plan.plan_id))
        .filter(financial_aid_subscription::Column::Status.eq(SubscriptionStatus::Active.as_str()))
        .count(db)
        .await?;

    if active_subscriptions > 0 {
        log::warn!(
            "Refused to delete plan {} with {} active subscriptions",
            plan.plan_id,
            active_subscriptions
        );
        return Err(AppError::PlanInUse);
    }

    let name = plan.plan_name.clone();
    plan.into_active_model().delete(db).await?;
    log::info!("Deleted subscription plan {} ({})", id, name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::subscriptions::functions::subscribe;
    use crate::database::types::SystemRole;
    use crate::test_utils::{create_user, date, setup_test_db};

    fn dto(name: &str, price: f64, months: i32) -> PlanDto {
        PlanDto {
            plan_name: Some(name.to_string()),
            price: Some(price),
            duration_in_months: Some(months),
            description: None,
        }
    }

    #[tokio::test]
    async fn plans_are_listed_by_name() {
        let db = setup_test_db().await;
        let names: Vec<String> = list(&db).await.unwrap().into_iter().map(|p| p.plan_name).collect();
        assert_eq!(names, vec!["Basic", "Free", "Premium"]);
    }

    #[tokio::test]
    async fn create_validates_and_rejects_duplicate_names() {
        let db = setup_test_db().await;

        let err = create(&db, PlanDto::default()).await.unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation failure");
        };
        assert!(errors.has("plan_name"));
        assert!(errors.has("price"));
        assert!(errors.has("duration_in_months"));

        let err = create(&db, dto("basic", 10.0, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicatePlanName(_)));

        let plan = create(&db, dto("Gold", 2999.999, 36)).await.unwrap();
        assert_eq!(plan.price, 3000.0);
        assert_eq!(plan.duration_in_months, 36);
    }

    #[tokio::test]
    async fn update_is_partial() {
        let db = setup_test_db().await;
        let plan = create(&db, dto("Gold", 2999.0, 36)).await.unwrap();

        let updated = update(
            &db,
            plan.plan_id,
            PlanDto {
                price: Some(2499.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price, 2499.0);
        assert_eq!(updated.plan_name, "Gold");
        assert_eq!(updated.duration_in_months, 36);

        let err = update(&db, plan.plan_id, dto("PREMIUM", 1.0, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicatePlanName(_)));
    }

    #[tokio::test]
    async fn deleting_plan_with_active_subscription_fails() {
        let db = setup_test_db().await;
        let user = create_user(&db, "director@example.com", SystemRole::Director).await;
        let gold = create(&db, dto("Gold", 2999.0, 36)).await.unwrap();
        subscribe(&db, user.id, gold.plan_id, date(2025, 3, 15)).await.unwrap();

        let err = destroy(&db, gold.plan_id).await.unwrap_err();
        assert!(matches!(err, AppError::PlanInUse));
        assert!(find(&db, gold.plan_id).await.is_ok());
    }

    #[tokio::test]
    async fn deleting_unreferenced_plan_succeeds() {
        let db = setup_test_db().await;
        let gold = create(&db, dto("Gold", 2999.0, 36)).await.unwrap();

        destroy(&db, gold.plan_id).await.unwrap();
        assert!(matches!(find(&db, gold.plan_id).await, Err(AppError::PlanNotFound)));
        assert!(matches!(destroy(&db, gold.plan_id).await, Err(AppError::PlanNotFound)));
    }
}
