use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    api::helpers::{add_months, format_peso},
    database::{
        models::{financial_aid_subscription as subscription, subscription_plan, subscription_transaction},
        types::SubscriptionStatus,
    },
    errors::AppError,
};

use super::structures::{SubscribeOutcome, SubscriptionView, TransactionView};

pub const PAYMENT_METHOD: &str = "Auto-Submit";

const NOTE_NEW: &str = "New subscription activation";
const NOTE_QUEUED: &str =
    "Subscription upgrade/change - Pending activation after current subscription expires";

pub async fn find_pending<C>(db: &C, user_id: i32) -> Result<Option<subscription::Model>, AppError>
where
    C: ConnectionTrait,
{
    Ok(subscription::Entity::find()
        .filter(subscription::Column::UserId.eq(user_id))
        .filter(subscription::Column::Status.eq(SubscriptionStatus::Pending.as_str()))
        .one(db)
        .await?)
}

/// The Active row whose `end_date` is today or later.
pub async fn find_current_active<C>(
    db: &C,
    user_id: i32,
    today: NaiveDate,
) -> Result<Option<subscription::Model>, AppError>
where
    C: ConnectionTrait,
{
    Ok(subscription::Entity::find()
        .filter(subscription::Column::UserId.eq(user_id))
        .filter(subscription::Column::Status.eq(SubscriptionStatus::Active.as_str()))
        .filter(subscription::Column::EndDate.gte(today))
        .order_by_desc(subscription::Column::EndDate)
        .one(db)
        .await?)
}

/// Promotes the user's Pending row to Active once no current Active row is
/// left. The queued row's placeholder dates are replaced by
/// `today..today + duration`.
pub async fn rollover_pending<C>(
    db: &C,
    user_id: i32,
    today: NaiveDate,
) -> Result<Option<subscription::Model>, AppError>
where
    C: ConnectionTrait,
{
    let Some(pending) = find_pending(db, user_id).await? else {
        return Ok(None);
    };
    if find_current_active(db, user_id, today).await?.is_some() {
        return Ok(None);
    }

    let plan = subscription_plan::Entity::find_by_id(pending.plan_id)
        .one(db)
        .await?
        .ok_or(AppError::PlanNotFound)?;

    let end_date = add_months(today, plan.duration_in_months)?;
    let mut active = pending.into_active_model();
    active.status = Set(SubscriptionStatus::Active.into());
    active.start_date = Set(today);
    active.end_date = Set(end_date);
    let promoted = active.update(db).await?;

    log::info!(
        "Activated queued subscription {} (plan {}) for user {} until {}",
        promoted.id,
        plan.plan_name,
        user_id,
        end_date
    );
    Ok(Some(promoted))
}

/// Rolls over every user holding a Pending row. Returns how many rows were promoted.
pub async fn rollover_all(db: &DatabaseConnection, today: NaiveDate) -> Result<usize, AppError> {
    let user_ids: Vec<i32> = subscription::Entity::find()
        .select_only()
        .column(subscription::Column::UserId)
        .filter(subscription::Column::Status.eq(SubscriptionStatus::Pending.as_str()))
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    let mut promoted = 0;
    for user_id in user_ids {
        if rollover_pending(db, user_id, today).await?.is_some() {
            promoted += 1;
        }
    }
    Ok(promoted)
}

/// Subscribes the user to a plan.
///
/// Without a current Active subscription the new row is Active immediately;
/// otherwise it is queued as Pending. At most one Pending row may exist per
/// user. The subscription row and its ledger row are written in a single
/// database transaction.
pub async fn subscribe(
    db: &DatabaseConnection,
    user_id: i32,
    plan_id: i32,
    today: NaiveDate,
) -> Result<SubscribeOutcome, AppError> {
    let plan = subscription_plan::Entity::find_by_id(plan_id)
        .one(db)
        .await?
        .ok_or(AppError::PlanNotFound)?;

    if plan.is_free() {
        return Err(AppError::FreePlanDirectSubscribeForbidden);
    }

    let txn = db.begin().await?;

    // Promotion of a queued row commits or rolls back together with the new rows
    rollover_pending(&txn, user_id, today).await?;

    if find_pending(&txn, user_id).await?.is_some() {
        return Err(AppError::PendingAlreadyExists);
    }

    let current_active = find_current_active(&txn, user_id, today).await?;
    let has_active = current_active.is_some();

    let (status, note) = if has_active {
        (SubscriptionStatus::Pending, NOTE_QUEUED)
    } else {
        (SubscriptionStatus::Active, NOTE_NEW)
    };
    // Pending rows get placeholder dates; rollover_pending assigns the real window.
    let start_date = today;
    let end_date = add_months(today, plan.duration_in_months)?;
    let now = Utc::now();

    let created = subscription::ActiveModel {
        user_id: Set(user_id),
        plan_id: Set(plan.plan_id),
        start_date: Set(start_date),
        end_date: Set(end_date),
        status: Set(status.into()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let transaction = subscription_transaction::ActiveModel {
        user_id: Set(user_id),
        old_plan_id: Set(current_active.as_ref().map(|s| s.plan_id)),
        new_plan_id: Set(plan.plan_id),
        payment_method: Set(PAYMENT_METHOD.to_string()),
        amount_paid: Set(plan.price),
        transaction_date: Set(now),
        notes: Set(Some(note.to_string())),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    log::info!(
        "User {} subscribed to plan {} ({}), status {}",
        user_id,
        plan.plan_id,
        plan.plan_name,
        status
    );

    let amount = format_peso(plan.price);
    let message = if has_active {
        format!(
            "Subscription request submitted successfully. It will become active when your current subscription expires. Transaction recorded for {}.",
            amount
        )
    } else {
        format!(
            "Subscription activated successfully! You now have access to {} features. Transaction recorded for {}.",
            plan.plan_name, amount
        )
    };

    let is_current = created.is_current(today);
    Ok(SubscribeOutcome {
        subscription: SubscriptionView {
            subscription: created,
            is_current,
            subscription_plan: Some(plan),
        },
        transaction,
        message,
    })
}

pub async fn cancel_pending(db: &DatabaseConnection, user_id: i32) -> Result<(), AppError> {
    let pending = find_pending(db, user_id)
        .await?
        .ok_or(AppError::NoPendingSubscription)?;

    let id = pending.id;
    pending.into_active_model().delete(db).await?;
    log::info!("User {} cancelled pending subscription {}", user_id, id);
    Ok(())
}

/// All of the user's rows, newest first, with plans attached.
pub async fn my_subscriptions(
    db: &DatabaseConnection,
    user_id: i32,
    today: NaiveDate,
) -> Result<Vec<SubscriptionView>, AppError> {
    rollover_pending(db, user_id, today).await?;

    let rows = subscription::Entity::find()
        .find_also_related(subscription_plan::Entity)
        .filter(subscription::Column::UserId.eq(user_id))
        .order_by_desc(subscription::Column::CreatedAt)
        .order_by_desc(subscription::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(row, plan)| SubscriptionView {
            is_current: row.is_current(today),
            subscription: row,
            subscription_plan: plan,
        })
        .collect())
}

/// Ledger rows of the user, newest `transaction_date` first.
pub async fn transaction_history(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<TransactionView>, AppError> {
    let transactions = subscription_transaction::Entity::find()
        .filter(subscription_transaction::Column::UserId.eq(user_id))
        .order_by_desc(subscription_transaction::Column::TransactionDate)
        .order_by_desc(subscription_transaction::Column::SubTransactionId)
        .all(db)
        .await?;

    let plan_ids: HashSet<i32> = transactions
        .iter()
        .flat_map(|t| t.old_plan_id.into_iter().chain(std::iter::once(t.new_plan_id)))
        .collect();

    let plans: HashMap<i32, subscription_plan::Model> = if plan_ids.is_empty() {
        HashMap::new()
    } else {
        subscription_plan::Entity::find()
            .filter(subscription_plan::Column::PlanId.is_in(plan_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|plan| (plan.plan_id, plan))
            .collect()
    };

    Ok(transactions
        .into_iter()
        .map(|transaction| TransactionView {
            old_plan: transaction.old_plan_id.and_then(|id| plans.get(&id).cloned()),
            new_plan: plans.get(&transaction.new_plan_id).cloned(),
            transaction,
        })
        .collect())
}
