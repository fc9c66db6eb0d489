use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

use super::models::{subscription_plan, system_role};
use super::types::SystemRole;

/// Plan catalogue shipped with a fresh installation: (name, price, months, description).
pub const DEFAULT_PLANS: [(&str, f64, i32, &str); 3] = [
    ("Free", 0.0, 1, "Free plan valid for 1 month."),
    ("Basic", 499.0, 24, "Basic plan valid for 2 years."),
    ("Premium", 1999.0, 60, "Premium plan valid for 5 years."),
];

/// Inserts the four system roles with their fixed ids. Safe to re-run.
pub async fn seed_roles<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    for role in SystemRole::ALL {
        if system_role::Entity::find_by_id(role.id()).one(db).await?.is_some() {
            continue;
        }
        system_role::ActiveModel {
            id: Set(role.id()),
            name: Set(role.name().to_string()),
        }
        .insert(db)
        .await?;
        log::info!("Seeded system role {}", role);
    }
    Ok(())
}

/// Update-or-create of the default plans keyed by name.
pub async fn seed_default_plans<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    for (name, price, months, description) in DEFAULT_PLANS {
        let existing = subscription_plan::Entity::find()
            .filter(subscription_plan::Column::PlanName.eq(name))
            .one(db)
            .await?;

        match existing {
            Some(plan) => {
                let mut active = plan.into_active_model();
                active.price = Set(price);
                active.duration_in_months = Set(months);
                active.description = Set(Some(description.to_string()));
                active.updated_at = Set(now);
                active.update(db).await?;
                log::info!("Updated plan {}", name);
            }
            None => {
                subscription_plan::ActiveModel {
                    plan_name: Set(name.to_string()),
                    price: Set(price),
                    duration_in_months: Set(months),
                    description: Set(Some(description.to_string())),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                log::info!("Created plan {}", name);
            }
        }
    }
    Ok(())
}
