use sea_orm::{ConnectionTrait, DbErr, EntityName, EntityTrait, Schema};

use super::models::{
    financial_aid, financial_aid_document, financial_aid_subscription, subscription_plan,
    subscription_transaction, system_role, user,
};

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let table = entity.table_name().to_string();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    log::debug!("Ensured table {}", table);
    Ok(())
}

/// Creates every table from the entity definitions. Idempotent; tables are
/// created in foreign-key order.
pub async fn create_schema<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, system_role::Entity).await?;
    create_table(db, &schema, user::Entity).await?;
    create_table(db, &schema, financial_aid::Entity).await?;
    create_table(db, &schema, financial_aid_document::Entity).await?;
    create_table(db, &schema, subscription_plan::Entity).await?;
    create_table(db, &schema, financial_aid_subscription::Entity).await?;
    create_table(db, &schema, subscription_transaction::Entity).await?;

    Ok(())
}
