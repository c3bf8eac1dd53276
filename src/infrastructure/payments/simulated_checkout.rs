use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::interfaces::checkout::CheckoutGateway,
    domain::value_objects::{
        enums::payment_modes::PaymentMode,
        subscriptions::{CheckoutPaymentStatus, CheckoutSession},
    },
};

struct SessionRecord {
    session: CheckoutSession,
    fulfilled: bool,
}

/// In-process checkout used in mock payment mode. Sessions are paid the moment they
/// are created and live only as long as the process.
pub struct SimulatedCheckoutGateway {
    mode: PaymentMode,
    base_url: String,
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl SimulatedCheckoutGateway {
    pub fn new(mode: PaymentMode, base_url: String) -> Self {
        Self {
            mode,
            base_url: base_url.trim_end_matches('/').to_string(),
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CheckoutGateway for SimulatedCheckoutGateway {
    fn mode(&self) -> PaymentMode {
        self.mode
    }

    async fn create_session(&self, subscriber_id: Uuid, plan_id: String) -> Result<CheckoutSession> {
        let session_id = format!("cs_mock_{}", Uuid::new_v4().simple());
        let session = CheckoutSession {
            url: format!(
                "{}/checkout/success?session_id={}",
                self.base_url, session_id
            ),
            session_id: session_id.clone(),
            subscriber_id,
            plan_id,
            payment_status: CheckoutPaymentStatus::Paid,
        };

        self.sessions.lock().await.insert(
            session_id.clone(),
            SessionRecord {
                session: session.clone(),
                fulfilled: false,
            },
        );

        info!(%subscriber_id, %session_id, "checkout: simulated session created");
        Ok(session)
    }

    async fn find_session(&self, session_id: String) -> Result<Option<CheckoutSession>> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(&session_id).map(|record| record.session.clone()))
    }

    async fn mark_fulfilled(&self, session_id: String) -> Result<bool> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&session_id) {
            Some(record) if !record.fulfilled => {
                record.fulfilled = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_fulfillment(&self, session_id: String) -> Result<()> {
        if let Some(record) = self.sessions.lock().await.get_mut(&session_id) {
            record.fulfilled = false;
        }
        Ok(())
    }
}
