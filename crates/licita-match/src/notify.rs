//! Outbound notification seam. Delivery mechanics live behind
//! [`NotificationDispatcher`]; the engine only decides who gets notified and
//! treats dispatch as fire-and-forget.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use licita_core::NotificationChannel;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Message(String),
}

/// Payload handed to the delivery layer on a real-time match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenderNotice {
    pub tender_id: Uuid,
    pub tender_name: String,
    pub expedient: String,
    pub criteria_id: Uuid,
    pub criteria_name: String,
    pub account_name: String,
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver one notice. For email the engine calls this once per
    /// recipient so one failed address cannot take down the rest; for chat
    /// the recipients slice is empty and the configured webhook is implied.
    async fn notify(
        &self,
        channel: NotificationChannel,
        recipients: &[String],
        notice: &TenderNotice,
    ) -> Result<(), DispatchError>;
}

/// Dispatcher that only logs; the CLI default.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDispatcher;

#[async_trait]
impl NotificationDispatcher for LoggingDispatcher {
    async fn notify(
        &self,
        channel: NotificationChannel,
        recipients: &[String],
        notice: &TenderNotice,
    ) -> Result<(), DispatchError> {
        info!(
            ?channel,
            recipients = recipients.join(","),
            tender = %notice.tender_id,
            criteria = %notice.criteria_id,
            "dispatching tender notification"
        );
        Ok(())
    }
}
