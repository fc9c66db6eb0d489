pub mod functions;
pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_cancel_pending_subscription, __path_get_my_subscriptions, __path_get_transaction_history,
    __path_subscribe, cancel_pending_subscription, get_my_subscriptions, get_transaction_history,
    init_routes, subscribe,
};

pub use structures::{SubscribeDto, SubscribeOutcome, SubscriptionView, TransactionView};
