use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::value_objects::{
    enums::payment_modes::PaymentMode, subscriptions::CheckoutSession,
};

/// Payment provider behind plan upgrades.
#[automock]
#[async_trait]
pub trait CheckoutGateway {
    fn mode(&self) -> PaymentMode;

    async fn create_session(&self, subscriber_id: Uuid, plan_id: String)
    -> Result<CheckoutSession>;

    async fn find_session(&self, session_id: String) -> Result<Option<CheckoutSession>>;

    /// Claims a paid session for fulfillment. Only the first call for a session returns
    /// `true`, so a plan is granted once per payment.
    async fn mark_fulfilled(&self, session_id: String) -> Result<bool>;

    /// Returns a claimed session to the unfulfilled state after the plan change failed.
    async fn release_fulfillment(&self, session_id: String) -> Result<()>;
}
