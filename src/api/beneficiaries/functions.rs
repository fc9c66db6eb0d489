use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    api::{
        facilities::functions::find_owned_facility,
        users::{email_taken, hash_password},
        validation::ValidationErrors,
    },
    database::{
        models::{financial_aid, user},
        types::{AccountStatus, SystemRole},
    },
    errors::AppError,
};

use super::structures::{BeneficiaryPage, CreateBeneficiaryDto, PageQuery, UpdateBeneficiaryDto};

const MIN_AGE: i32 = 1;
const MAX_AGE: i32 = 120;

/// The facility owned by the caller; beneficiaries are always scoped to it.
pub async fn caller_facility(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<financial_aid::Model, AppError> {
    find_owned_facility(db, user_id)
        .await?
        .ok_or(AppError::NoFacility)
}

fn validate_create(dto: &CreateBeneficiaryDto) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.required("firstname", dto.firstname.as_deref(), 255);
    errors.optional("middlename", dto.middlename.as_deref(), 255);
    errors.required("lastname", dto.lastname.as_deref(), 255);
    errors.contact_number("contact_number", dto.contact_number.as_deref());
    errors.optional("address", dto.address.as_deref(), 500);
    errors.email("email", dto.email.as_deref());
    errors.password(dto.password.as_deref(), dto.password_confirmation.as_deref());
    match dto.age {
        None => errors.add("age", "The age field is required."),
        age => errors.range_i32("age", age, MIN_AGE, MAX_AGE),
    }
    errors.required("enrolled_school", dto.enrolled_school.as_deref(), 200);
    errors.required("school_year", dto.school_year.as_deref(), 50);
    errors
}

fn validate_update(dto: &UpdateBeneficiaryDto) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if dto.firstname.is_some() {
        errors.required("firstname", dto.firstname.as_deref(), 255);
    }
    if dto.lastname.is_some() {
        errors.required("lastname", dto.lastname.as_deref(), 255);
    }
    if let Some(Some(middlename)) = dto.middlename.as_ref() {
        errors.max_len("middlename", middlename, 255);
    }
    if let Some(contact) = dto.contact_number.as_ref() {
        errors.contact_number("contact_number", contact.as_deref());
    }
    if let Some(Some(address)) = dto.address.as_ref() {
        errors.max_len("address", address, 500);
    }
    if dto.email.is_some() {
        errors.email("email", dto.email.as_deref());
    }
    if dto.password.is_some() {
        errors.password(dto.password.as_deref(), dto.password_confirmation.as_deref());
    }
    errors.range_i32("age", dto.age, MIN_AGE, MAX_AGE);
    if dto.enrolled_school.is_some() {
        errors.required("enrolled_school", dto.enrolled_school.as_deref(), 200);
    }
    if dto.school_year.is_some() {
        errors.required("school_year", dto.school_year.as_deref(), 50);
    }
    if let Some(status) = dto.status.as_deref() {
        if AccountStatus::parse(status).is_none() {
            errors.add("status", "The selected status is invalid.");
        }
    }
    errors
}

/// One page of the facility's beneficiaries, newest first.
pub async fn list(
    db: &DatabaseConnection,
    facility: financial_aid::Model,
    query: &PageQuery,
) -> Result<BeneficiaryPage, AppError> {
    let page = query.page();
    let per_page = query.per_page();

    let paginator = user::Entity::find()
        .filter(user::Column::FinancialAidId.eq(facility.id))
        .filter(user::Column::SystemroleId.eq(SystemRole::Beneficiary.id()))
        .order_by_desc(user::Column::CreatedAt)
        .order_by_desc(user::Column::Id)
        .paginate(db, per_page);

    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(BeneficiaryPage {
        items,
        total,
        page,
        per_page,
        last_page: total.div_ceil(per_page).max(1),
        facility,
    })
}

/// A beneficiary of the given facility; anything else is a 404.
pub async fn find_scoped(
    db: &DatabaseConnection,
    facility: &financial_aid::Model,
    id: i32,
) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .filter(user::Column::FinancialAidId.eq(facility.id))
        .filter(user::Column::SystemroleId.eq(SystemRole::Beneficiary.id()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Beneficiary with id {} not found", id)))
}

pub async fn create(
    db: &DatabaseConnection,
    owner_id: i32,
    dto: CreateBeneficiaryDto,
) -> Result<user::Model, AppError> {
    let facility = caller_facility(db, owner_id).await?;
    if !facility.is_managable {
        return Err(AppError::FacilityNotApproved);
    }

    let mut errors = validate_create(&dto);
    let email = dto.email.as_deref().unwrap_or_default().trim().to_string();
    if !errors.has("email") && email_taken(db, &email, None).await? {
        errors.add("email", "The email has already been taken.");
    }
    errors.into_result()?;

    let now = Utc::now();
    let beneficiary = user::ActiveModel {
        firstname: Set(dto.firstname.unwrap_or_default().trim().to_string()),
        middlename: Set(dto.middlename),
        lastname: Set(dto.lastname.unwrap_or_default().trim().to_string()),
        contact_number: Set(dto.contact_number),
        address: Set(dto.address),
        email: Set(email),
        password: Set(hash_password(dto.password.as_deref().unwrap_or_default())?),
        status: Set(AccountStatus::Active.as_str().to_string()),
        systemrole_id: Set(SystemRole::Beneficiary.id()),
        financial_aid_id: Set(Some(facility.id)),
        age: Set(dto.age),
        enrolled_school: Set(dto.enrolled_school),
        school_year: Set(dto.school_year),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!(
        "Facility {} enrolled beneficiary {}",
        facility.id,
        beneficiary.id
    );
    Ok(beneficiary)
}

pub async fn update(
    db: &DatabaseConnection,
    beneficiary: user::Model,
    dto: UpdateBeneficiaryDto,
) -> Result<user::Model, AppError> {
    let mut errors = validate_update(&dto);
    if let Some(email) = dto.email.as_deref().map(str::trim) {
        if !errors.has("email") && email_taken(db, email, Some(beneficiary.id)).await? {
            errors.add("email", "The email has already been taken.");
        }
    }
    errors.into_result()?;

    let mut active = beneficiary.into_active_model();
    if let Some(firstname) = dto.firstname {
        active.firstname = Set(firstname.trim().to_string());
    }
    if let Some(middlename) = dto.middlename {
        active.middlename = Set(middlename);
    }
    if let Some(lastname) = dto.lastname {
        active.lastname = Set(lastname.trim().to_string());
    }
    if let Some(contact_number) = dto.contact_number {
        active.contact_number = Set(contact_number);
    }
    if let Some(address) = dto.address {
        active.address = Set(address);
    }
    if let Some(email) = dto.email {
        active.email = Set(email.trim().to_string());
    }
    if let Some(password) = dto.password.as_deref() {
        active.password = Set(hash_password(password)?);
    }
    if dto.age.is_some() {
        active.age = Set(dto.age);
    }
    if dto.enrolled_school.is_some() {
        active.enrolled_school = Set(dto.enrolled_school);
    }
    if dto.school_year.is_some() {
        active.school_year = Set(dto.school_year);
    }
    if let Some(status) = dto.status.as_deref().and_then(AccountStatus::parse) {
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

pub async fn destroy(db: &DatabaseConnection, beneficiary: user::Model) -> Result<(), AppError> {
    let id = beneficiary.id;
    let facility_id = beneficiary.financial_aid_id;
    beneficiary.into_active_model().delete(db).await?;
    log::info!("Removed beneficiary {} from facility {:?}", id, facility_id);
    Ok(())
}
