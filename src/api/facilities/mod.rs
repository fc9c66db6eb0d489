pub mod functions;
pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_delete_facility, __path_get_facilities, __path_get_facility, __path_get_my_facilities,
    __path_register_facility, __path_update_facility, __path_update_facility_status,
    delete_facility, get_facilities, get_facility, get_my_facilities, init_routes,
    register_facility, update_facility, update_facility_status,
};

pub use structures::{
    DocumentDto, FacilityStatusDto, FacilityView, RegisterFacilityDto, UpdateFacilityDto,
};
