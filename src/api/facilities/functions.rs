use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::{
    api::{context::UserContext, validation::ValidationErrors},
    database::models::{financial_aid, financial_aid_document, user},
    errors::AppError,
};

use super::structures::{FacilityView, RegisterFacilityDto, UpdateFacilityDto};

const CENTER_ID_PREFIX: &str = "FAC-";
const CENTER_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CENTER_ID_ATTEMPTS: usize = 16;
const DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

/// `FAC-` followed by eight random uppercase alphanumerics.
pub fn generate_center_id() -> String {
    let suffix: String = (0..8)
        .map(|_| CENTER_ID_ALPHABET[fastrand::usize(..CENTER_ID_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", CENTER_ID_PREFIX, suffix)
}

fn validate_coordinates(
    errors: &mut ValidationErrors,
    latitude: Option<f64>,
    longitude: Option<f64>,
) {
    errors.range_f64("latitude", latitude, -90.0, 90.0);
    errors.range_f64("longitude", longitude, -180.0, 180.0);
}

fn has_allowed_extension(path: &str) -> bool {
    path.rsplit_once('.')
        .map(|(_, ext)| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

pub fn validate_registration(dto: &RegisterFacilityDto) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();
    errors.required("center_name", dto.center_name.as_deref(), 255);
    if let Some(center_id) = dto.center_id.as_deref() {
        errors.required("center_id", Some(center_id), 32);
    }
    validate_coordinates(&mut errors, dto.latitude, dto.longitude);
    errors.optional("description", dto.description.as_deref(), 1000);

    for (i, document) in dto.documents.iter().flatten().enumerate() {
        let type_field = format!("documents.{}.type", i);
        let path_field = format!("documents.{}.path", i);
        errors.required(&type_field, document.document_type.as_deref(), 100);
        errors.required(&path_field, document.path.as_deref(), 255);
        if let Some(path) = document.path.as_deref().filter(|p| !p.trim().is_empty()) {
            if !has_allowed_extension(path) {
                errors.add(
                    &path_field,
                    format!("The {} field must be a file of type: pdf, jpg, jpeg, png.", path_field),
                );
            }
        }
    }

    errors.into_result()
}

pub fn validate_update(dto: &UpdateFacilityDto) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();
    if dto.center_name.is_some() {
        errors.required("center_name", dto.center_name.as_deref(), 255);
    }
    validate_coordinates(&mut errors, dto.latitude.flatten(), dto.longitude.flatten());
    if let Some(Some(description)) = dto.description.as_ref() {
        errors.max_len("description", description, 1000);
    }
    errors.into_result()
}

async fn center_id_taken<C>(db: &C, center_id: &str) -> Result<bool, AppError>
where
    C: ConnectionTrait,
{
    Ok(financial_aid::Entity::find()
        .filter(financial_aid::Column::CenterId.eq(center_id))
        .one(db)
        .await?
        .is_some())
}

async fn pick_center_id(db: &DatabaseConnection, requested: Option<&str>) -> Result<String, AppError> {
    if let Some(requested) = requested {
        let center_id = requested.trim().to_uppercase();
        if center_id_taken(db, &center_id).await? {
            return Err(AppError::DuplicateCenterId(center_id));
        }
        return Ok(center_id);
    }

    for _ in 0..CENTER_ID_ATTEMPTS {
        let candidate = generate_center_id();
        if !center_id_taken(db, &candidate).await? {
            return Ok(candidate);
        }
        log::debug!("Generated center id {} collided, retrying", candidate);
    }
    log::error!("Could not generate a free center id after {} attempts", CENTER_ID_ATTEMPTS);
    Err(AppError::Internal)
}

/// Unique violations that slip past the pre-checks (concurrent registrations).
fn map_unique_violation(err: DbErr, center_id: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("center_id") => {
            AppError::DuplicateCenterId(center_id.to_string())
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateFacility,
        _ => AppError::DbError(err),
    }
}

pub async fn find_facility<C>(db: &C, id: i32) -> Result<financial_aid::Model, AppError>
where
    C: ConnectionTrait,
{
    financial_aid::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Facility with id {} not found", id)))
}

pub async fn find_owned_facility<C>(db: &C, user_id: i32) -> Result<Option<financial_aid::Model>, AppError>
where
    C: ConnectionTrait,
{
    Ok(financial_aid::Entity::find()
        .filter(financial_aid::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// Owner of the facility or an admin.
pub fn ensure_can_manage(ctx: &UserContext, facility: &financial_aid::Model) -> Result<(), AppError> {
    if ctx.is_admin() || ctx.is_same_user(facility.user_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden("You do not manage this facility".to_string()))
    }
}

pub async fn load_view(
    db: &DatabaseConnection,
    facility: financial_aid::Model,
) -> Result<FacilityView, AppError> {
    let owner = facility.find_related(user::Entity).one(db).await?;
    let documents = facility
        .find_related(financial_aid_document::Entity)
        .order_by_asc(financial_aid_document::Column::Id)
        .all(db)
        .await?;
    Ok(FacilityView {
        facility,
        owner,
        documents,
    })
}

/// Registers the caller's facility. New facilities await admin approval.
pub async fn register(
    db: &DatabaseConnection,
    user_id: i32,
    dto: RegisterFacilityDto,
) -> Result<FacilityView, AppError> {
    validate_registration(&dto)?;

    if find_owned_facility(db, user_id).await?.is_some() {
        return Err(AppError::DuplicateFacility);
    }

    let center_id = pick_center_id(db, dto.center_id.as_deref()).await?;
    let now = Utc::now();

    let txn = db.begin().await?;

    let facility = financial_aid::ActiveModel {
        user_id: Set(user_id),
        center_id: Set(center_id.clone()),
        center_name: Set(dto.center_name.unwrap_or_default().trim().to_string()),
        longitude: Set(dto.longitude),
        latitude: Set(dto.latitude),
        description: Set(dto.description),
        is_managable: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| map_unique_violation(e, &center_id))?;

    for document in dto.documents.unwrap_or_default() {
        financial_aid_document::ActiveModel {
            financial_aid_id: Set(facility.id),
            document_type: Set(document.document_type.unwrap_or_default()),
            document_path: Set(document.path.unwrap_or_default()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    log::info!(
        "User {} registered facility {} ({}), awaiting approval",
        user_id,
        facility.id,
        facility.center_id
    );
    load_view(db, facility).await
}

/// Zero or one facility owned by the caller.
pub async fn list_mine(db: &DatabaseConnection, user_id: i32) -> Result<Vec<FacilityView>, AppError> {
    let mut views = Vec::new();
    if let Some(facility) = find_owned_facility(db, user_id).await? {
        views.push(load_view(db, facility).await?);
    }
    Ok(views)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<FacilityView>, AppError> {
    let facilities = financial_aid::Entity::find()
        .order_by_desc(financial_aid::Column::CreatedAt)
        .all(db)
        .await?;

    let mut views = Vec::with_capacity(facilities.len());
    for facility in facilities {
        views.push(load_view(db, facility).await?);
    }
    Ok(views)
}

pub async fn set_approval(
    db: &DatabaseConnection,
    id: i32,
    approved: bool,
) -> Result<financial_aid::Model, AppError> {
    let facility = find_facility(db, id).await?;
    let mut active = facility.into_active_model();
    active.is_managable = Set(approved);
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;
    log::info!(
        "Facility {} has been {}",
        updated.id,
        if approved { "approved" } else { "rejected" }
    );
    Ok(updated)
}

pub async fn update(
    db: &DatabaseConnection,
    facility: financial_aid::Model,
    dto: UpdateFacilityDto,
) -> Result<financial_aid::Model, AppError> {
    validate_update(&dto)?;

    let mut active = facility.into_active_model();
    if let Some(name) = dto.center_name {
        active.center_name = Set(name.trim().to_string());
    }
    if let Some(longitude) = dto.longitude {
        active.longitude = Set(longitude);
    }
    if let Some(latitude) = dto.latitude {
        active.latitude = Set(latitude);
    }
    if let Some(description) = dto.description {
        active.description = Set(description);
    }
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

/// Removes the facility together with its document records.
pub async fn delete(db: &DatabaseConnection, facility: financial_aid::Model) -> Result<(), AppError> {
    let txn = db.begin().await?;
    financial_aid_document::Entity::delete_many()
        .filter(financial_aid_document::Column::FinancialAidId.eq(facility.id))
        .exec(&txn)
        .await?;
    let id = facility.id;
    facility.into_active_model().delete(&txn).await?;
    txn.commit().await?;
    log::info!("Deleted facility {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::facilities::structures::DocumentDto;
    use crate::database::types::SystemRole;
    use crate::test_utils::{create_user, setup_test_db};

    fn registration(name: &str) -> RegisterFacilityDto {
        RegisterFacilityDto {
            center_name: Some(name.to_string()),
            latitude: Some(14.5995),
            longitude: Some(120.9842),
            documents: Some(vec![DocumentDto {
                document_type: Some("business_permit".to_string()),
                path: Some("financial-aid-documents/permit.pdf".to_string()),
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn generated_center_ids_have_expected_shape() {
        let id = generate_center_id();
        assert_eq!(id.len(), 12);
        assert!(id.starts_with("FAC-"));
        assert!(id[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn registration_validation_reports_each_field() {
        let dto = RegisterFacilityDto {
            latitude: Some(123.0),
            documents: Some(vec![DocumentDto {
                document_type: None,
                path: Some("scan.exe".to_string()),
            }]),
            ..Default::default()
        };
        let Err(AppError::Validation(errors)) = validate_registration(&dto) else {
            panic!("expected validation failure");
        };
        assert!(errors.has("center_name"));
        assert!(errors.has("latitude"));
        assert!(errors.has("documents.0.type"));
        assert!(errors.has("documents.0.path"));
        assert!(!errors.has("longitude"));
    }

    #[tokio::test]
    async fn register_creates_unapproved_facility_with_documents() {
        let db = setup_test_db().await;
        let director = create_user(&db, "director@example.com", SystemRole::Director).await;

        let view = register(&db, director.id, registration("Bayanihan Center"))
            .await
            .unwrap();

        assert!(!view.facility.is_managable);
        assert!(view.facility.center_id.starts_with("FAC-"));
        assert_eq!(view.documents.len(), 1);
        assert_eq!(view.documents[0].document_type, "business_permit");
        assert_eq!(view.owner.map(|o| o.id), Some(director.id));
    }

    #[tokio::test]
    async fn user_can_own_at_most_one_facility() {
        let db = setup_test_db().await;
        let director = create_user(&db, "director@example.com", SystemRole::Director).await;

        register(&db, director.id, registration("First")).await.unwrap();
        let err = register(&db, director.id, registration("Second")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateFacility));

        assert_eq!(list_mine(&db, director.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn explicit_center_id_must_be_unique() {
        let db = setup_test_db().await;
        let first = create_user(&db, "one@example.com", SystemRole::Director).await;
        let second = create_user(&db, "two@example.com", SystemRole::Director).await;

        let mut dto = registration("First");
        dto.center_id = Some("FAC-ABCD1234".to_string());
        register(&db, first.id, dto).await.unwrap();

        let mut dto = registration("Second");
        dto.center_id = Some("fac-abcd1234".to_string());
        let err = register(&db, second.id, dto).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateCenterId(ref id) if id == "FAC-ABCD1234"));
    }

    #[tokio::test]
    async fn approval_toggles_managable_flag() {
        let db = setup_test_db().await;
        let director = create_user(&db, "director@example.com", SystemRole::Director).await;
        let view = register(&db, director.id, registration("Center")).await.unwrap();

        let approved = set_approval(&db, view.facility.id, true).await.unwrap();
        assert!(approved.is_managable);
        let rejected = set_approval(&db, view.facility.id, false).await.unwrap();
        assert!(!rejected.is_managable);

        let err = set_approval(&db, 4242, true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let db = setup_test_db().await;
        let director = create_user(&db, "director@example.com", SystemRole::Director).await;
        let view = register(&db, director.id, registration("Center")).await.unwrap();

        let dto: UpdateFacilityDto =
            serde_json::from_str(r#"{"center_name": "Renamed", "latitude": null}"#).unwrap();
        let updated = update(&db, view.facility.clone(), dto).await.unwrap();

        assert_eq!(updated.center_name, "Renamed");
        assert_eq!(updated.latitude, None);
        assert_eq!(updated.longitude, view.facility.longitude);
    }

    #[tokio::test]
    async fn delete_removes_documents_too() {
        let db = setup_test_db().await;
        let director = create_user(&db, "director@example.com", SystemRole::Director).await;
        let view = register(&db, director.id, registration("Center")).await.unwrap();

        delete(&db, view.facility).await.unwrap();

        assert!(list_mine(&db, director.id).await.unwrap().is_empty());
        let documents = financial_aid_document::Entity::find().all(&db).await.unwrap();
        assert!(documents.is_empty());
    }
}
