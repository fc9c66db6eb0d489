pub mod functions;
pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_create_beneficiary, __path_delete_beneficiary, __path_get_beneficiaries,
    __path_get_beneficiary, __path_update_beneficiary, create_beneficiary, delete_beneficiary,
    get_beneficiaries, get_beneficiary, init_routes, update_beneficiary,
};

pub use structures::{BeneficiaryPage, CreateBeneficiaryDto, PageQuery, UpdateBeneficiaryDto};
