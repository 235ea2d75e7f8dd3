pub mod checkout;
pub mod comparison;
pub mod entitlement;

pub mod services {
    pub mod pay;
    pub mod sub;
}

pub mod misc {
    pub mod pay;
}

pub use checkout::{
    CheckoutOrchestrator, CheckoutState, FailureReason, PaymentWidget, ProviderEvent, Settlement,
    WidgetOptions,
};
pub use entitlement::{Entitlement, UsageLevel};
