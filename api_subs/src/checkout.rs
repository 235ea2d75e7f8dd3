//! Paid checkout through the hosted payment widget.
//!
//! ```text
//! Idle -> CreatingOrder -> AwaitingProvider -> Verifying -> Settled(Success)
//!   ^           |                  |               |
//!   +-----------+------------------+---------------+  (any failure)
//! ```
//!
//! One orchestrator runs one checkout at a time. A second `begin` while a
//! checkout is in flight is refused before any request is made, which is
//! the only duplicate-submission guard: requests carry no idempotency key.

use std::fmt;

use api_auth::Session;
use async_trait::async_trait;
use common::env_config::Config;
use common::error::{AppError, Res};
use common::misc::capitalize;
use log::{error, info, warn};
use models::dtos::sub::{
    CreateOrderRequest, CreateOrderResponse, Order, VerifyPaymentRequest, VerifyPaymentResponse,
};
use models::models::plan::Plan;
use models::models::subscription::BillingCycle;
use models::models::user::UserPatch;
use serde::Serialize;

use crate::services::pay::record_failed_payment;

/// Script a browser host injects before opening the widget.
pub const WIDGET_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    CreatingOrder,
    AwaitingProvider,
    Verifying,
    Settled(Settlement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Success,
    Failure(FailureReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The provider declined the payment.
    Declined(String),
    /// The user closed the widget.
    Dismissed,
    /// The backend did not accept the provider's signature.
    VerificationFailed(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Declined(description) => write!(f, "Payment failed: {}", description),
            FailureReason::Dismissed => f.write_str("Payment cancelled"),
            FailureReason::VerificationFailed(_) => {
                f.write_str("Payment verification failed. Please contact support.")
            }
        }
    }
}

/// Outcome reported by the payment widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    Succeeded {
        payment_id: String,
        order_id: String,
        signature: String,
    },
    Failed {
        description: String,
        payment_id: Option<String>,
    },
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prefill {
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notes {
    pub plan_id: String,
    pub interval: BillingCycle,
    pub plan_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub color: String,
}

/// Everything the widget needs to open; serializes to the widget's own
/// option names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetOptions {
    pub key: String,
    /// Minor currency units.
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: Prefill,
    pub notes: Notes,
    pub theme: Theme,
}

/// Hosted payment widget. Opens with the given options and resolves once
/// the user pays, the payment fails or the widget is closed.
#[async_trait]
pub trait PaymentWidget: Send + Sync {
    async fn open(&self, options: &WidgetOptions) -> Res<ProviderEvent>;
}

struct PendingOrder {
    id: String,
    order: Order,
}

pub struct CheckoutOrchestrator {
    state: CheckoutState,
    app_name: String,
    theme_color: String,
    pending: Option<PendingOrder>,
}

impl CheckoutOrchestrator {
    pub fn new(app_name: impl Into<String>, theme_color: impl Into<String>) -> Self {
        CheckoutOrchestrator {
            state: CheckoutState::Idle,
            app_name: app_name.into(),
            theme_color: theme_color.into(),
            pending: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.app_name.clone(), config.checkout_theme_color.clone())
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Whether the subscribe control is enabled.
    pub fn can_subscribe(&self) -> bool {
        self.state == CheckoutState::Idle
    }

    /// Returns a settled checkout to `Idle`.
    pub fn reset(&mut self) {
        self.state = CheckoutState::Idle;
        self.pending = None;
    }

    /// Creates the provider order and returns the widget options.
    ///
    /// # Errors
    ///
    /// * [`AppError::CheckoutInProgress`] if not `Idle`; no request is made
    /// * [`AppError::InvalidServerResponse`] if the order has no id or key
    /// * any backend or transport error from order creation
    ///
    /// Every error leaves the orchestrator `Idle`.
    pub async fn begin(
        &mut self,
        session: &mut Session,
        plan: &Plan,
        cycle: BillingCycle,
    ) -> Res<WidgetOptions> {
        if !self.can_subscribe() {
            return Err(AppError::CheckoutInProgress);
        }
        let user = session.require_user()?.clone();

        self.state = CheckoutState::CreatingOrder;
        let req = CreateOrderRequest {
            plan_id: plan.id.clone(),
            interval: cycle,
        };
        let res: Res<CreateOrderResponse> = session
            .api()
            .post(
                "/api/subscriptions/create",
                &req,
                "Payment initialization failed. Please try again.",
            )
            .await;

        let res = match session.guard(res) {
            Ok(res) => res,
            Err(err) => {
                self.reset();
                return Err(err);
            }
        };

        let (order, order_id, key) = match (res.order, res.key_id) {
            (Some(order), Some(key)) => match order.id.clone().filter(|id| !id.is_empty()) {
                Some(id) => (order, id, key),
                None => return Err(self.invalid_order()),
            },
            _ => return Err(self.invalid_order()),
        };

        let prefill_user = res.user.unwrap_or(user);
        let options = WidgetOptions {
            key,
            amount: order.amount,
            currency: order.currency.clone(),
            name: self.app_name.clone(),
            description: format!("{} Plan ({})", capitalize(plan.name.as_str()), cycle),
            order_id: order_id.clone(),
            prefill: Prefill {
                email: prefill_user.email,
                contact: prefill_user.phone.unwrap_or_default(),
            },
            notes: Notes {
                plan_id: plan.id.to_string(),
                interval: cycle,
                plan_name: plan.name.to_string(),
            },
            theme: Theme {
                color: self.theme_color.clone(),
            },
        };

        info!("Created order {} for {} plan", order_id, plan.name);
        self.pending = Some(PendingOrder { id: order_id, order });
        self.state = CheckoutState::AwaitingProvider;
        Ok(options)
    }

    /// Applies the widget's outcome.
    ///
    /// A success is forwarded verbatim for verification and, once accepted,
    /// replaces the session user. A decline is recorded server-side on a
    /// best-effort basis. Only a verified payment settles; every failure
    /// returns the orchestrator to `Idle`.
    pub async fn handle(&mut self, session: &mut Session, event: ProviderEvent) -> Res<Settlement> {
        if self.state != CheckoutState::AwaitingProvider {
            return Err(AppError::BadRequest(
                "No checkout is waiting for the payment provider".to_string(),
            ));
        }
        let pending = self.pending.take();

        let settlement = match event {
            ProviderEvent::Succeeded {
                payment_id,
                order_id,
                signature,
            } => {
                self.state = CheckoutState::Verifying;
                let req = VerifyPaymentRequest {
                    razorpay_payment_id: payment_id,
                    razorpay_order_id: order_id,
                    razorpay_signature: signature,
                };
                let res: Res<VerifyPaymentResponse> = session
                    .api()
                    .post(
                        "/api/subscriptions/verify",
                        &req,
                        "Payment verification failed",
                    )
                    .await;

                match session.guard(res) {
                    Ok(res) => {
                        if let Some(user) = res.user {
                            session.set_user(user);
                        } else if let Some(sub) = res.subscription {
                            session.update_user(UserPatch::subscription(sub.tier, sub.status));
                        }
                        info!("Payment verified for order {}", req.razorpay_order_id);
                        Settlement::Success
                    }
                    Err(err) => {
                        error!("Payment verification error: {}", err);
                        Settlement::Failure(FailureReason::VerificationFailed(err.user_message()))
                    }
                }
            }
            ProviderEvent::Failed {
                description,
                payment_id,
            } => {
                warn!("Payment failed: {}", description);
                if let Some(pending) = &pending {
                    if let Err(err) = record_failed_payment(
                        session.api(),
                        &pending.id,
                        &pending.order,
                        payment_id.as_deref(),
                    )
                    .await
                    {
                        error!("Error recording failed payment: {}", err);
                    }
                }
                Settlement::Failure(FailureReason::Declined(description))
            }
            ProviderEvent::Dismissed => {
                info!("Checkout dismissed");
                Settlement::Failure(FailureReason::Dismissed)
            }
        };

        self.state = match &settlement {
            Settlement::Success => CheckoutState::Settled(Settlement::Success),
            Settlement::Failure(_) => CheckoutState::Idle,
        };
        Ok(settlement)
    }

    /// Full checkout: create the order, open the widget, apply its outcome.
    pub async fn run(
        &mut self,
        session: &mut Session,
        plan: &Plan,
        cycle: BillingCycle,
        widget: &dyn PaymentWidget,
    ) -> Res<Settlement> {
        let options = self.begin(session, plan, cycle).await?;
        let event = match widget.open(&options).await {
            Ok(event) => event,
            Err(err) => {
                self.reset();
                return Err(err);
            }
        };
        self.handle(session, event).await
    }

    fn invalid_order(&mut self) -> AppError {
        self.reset();
        AppError::InvalidServerResponse("Invalid order response from server".to_string())
    }
}
