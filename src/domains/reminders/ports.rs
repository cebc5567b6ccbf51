use super::types::Reminder;
use crate::common::GatewayResult;
use async_trait::async_trait;

#[async_trait]
pub trait ReminderSource: Send + Sync {
    async fn fetch_reminders(&self) -> GatewayResult<Vec<Reminder>>;
}
