use actix_web::web;

pub mod beneficiaries;
pub mod context;
pub mod docs;
pub mod extract;
pub mod facilities;
pub mod helpers;
pub mod middleware;
pub mod subscription_plans;
pub mod subscriptions;
pub mod users;
pub mod validation;

/// Все маршруты API под префиксом `/api`
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(users::init_routes)
            .configure(facilities::init_routes)
            .configure(subscription_plans::init_routes)
            .configure(subscriptions::init_routes)
            .configure(beneficiaries::init_routes),
    );
}
