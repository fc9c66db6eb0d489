pub mod functions;
pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_create_plan, __path_delete_plan, __path_get_plan, __path_get_plans, __path_update_plan,
    create_plan, delete_plan, get_plan, get_plans, init_routes, update_plan,
};

pub use structures::PlanDto;
